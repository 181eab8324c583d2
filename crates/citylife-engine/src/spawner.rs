//! City construction from configuration.
//!
//! Builds the transport network from the pre-parsed zone and line
//! definitions, distributes businesses to zones by their business-share
//! percentage, and spawns the starting population. Everything is drawn
//! from one seeded RNG, so runs are reproducible given the same
//! configuration.

use citylife_agents::{Business, BusinessKind, Person};
use citylife_core::{CityState, SimulationConfig, TransportDef, ZoneDef};
use citylife_world::{TransportLine, TransportNetwork, Zone};
use citylife_world::zone::{Boundary, IncomeRange};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::EngineError;

/// First names used for spawned persons.
const FIRST_NAMES: [&str; 12] = [
    "Ada", "Bruno", "Carla", "Diego", "Elena", "Fabio", "Giulia", "Hugo", "Ines", "Jonas", "Kira",
    "Luca",
];

/// Surnames used for spawned persons.
const SURNAMES: [&str; 10] = [
    "Rossi", "Bianchi", "Moretti", "Greco", "Conti", "Ferrari", "Romano", "Costa", "Fontana",
    "Marino",
];

/// Build the transport network from the configured definitions.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] if a transport definition names an
/// unknown zone, or [`EngineError::World`] on duplicate zones, pairs,
/// or self-pairs.
pub fn build_network(
    zones: &[ZoneDef],
    transport: &[TransportDef],
) -> Result<TransportNetwork, EngineError> {
    let mut network = TransportNetwork::new();
    for def in zones {
        let zone = Zone::new(
            def.name.clone(),
            Boundary::new(def.x, def.y, def.width, def.height),
            def.business_share,
            IncomeRange::new(def.welfare_min, def.welfare_max),
        );
        network.add_zone(zone)?;
    }
    for def in transport {
        let from = zone_id_by_name(&network, &def.from)?;
        let to = zone_id_by_name(&network, &def.to)?;
        let line = TransportLine::new(def.name.clone(), def.capacity, def.duration_minutes);
        network.connect(from, to, line)?;
    }
    Ok(network)
}

fn zone_id_by_name(
    network: &TransportNetwork,
    name: &str,
) -> Result<citylife_types::ZoneId, EngineError> {
    network
        .zone_by_name(name)
        .map(|z| z.id)
        .ok_or_else(|| EngineError::Spawner {
            message: format!("transport line references unknown zone: {name}"),
        })
}

/// How many businesses each zone receives.
///
/// The total is `people / residents_per_business` (at least one),
/// apportioned by each zone's business-share percentage with the
/// integer-division remainder assigned round-robin in definition order.
pub fn business_counts(zones: &[ZoneDef], people: u32, residents_per_business: u32) -> Vec<u32> {
    let total = people
        .checked_div(residents_per_business)
        .unwrap_or(0)
        .max(1);
    let mut counts: Vec<u32> = zones
        .iter()
        .map(|z| {
            total
                .saturating_mul(u32::from(z.business_share))
                .checked_div(100)
                .unwrap_or(0)
        })
        .collect();
    let assigned: u32 = counts.iter().copied().fold(0, u32::saturating_add);
    let mut remainder = total.saturating_sub(assigned);
    let mut index = 0_usize;
    while remainder > 0 && !counts.is_empty() {
        if let Some(count) = counts.get_mut(index) {
            *count = count.saturating_add(1);
            remainder = remainder.saturating_sub(1);
        }
        index = index.saturating_add(1);
        if index >= counts.len() {
            index = 0;
        }
    }
    counts
}

/// Build the complete starting city from configuration.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] on malformed definitions,
/// [`EngineError::World`] if the network cannot be built, or
/// [`EngineError::Agent`] if a person cannot be created (for example a
/// missing route between their residence and business zones).
pub fn spawn_city(config: &SimulationConfig) -> Result<CityState, EngineError> {
    let network = build_network(&config.zones, &config.transport)?;
    let mut rng = StdRng::seed_from_u64(config.simulation.seed);

    // Businesses, distributed by zone business share.
    let counts = business_counts(
        &config.zones,
        config.population.people,
        config.population.residents_per_business,
    );
    let mut businesses: Vec<Business> = Vec::new();
    for (def, count) in config.zones.iter().zip(counts.iter().copied()) {
        let zone = network
            .zone_by_name(&def.name)
            .ok_or_else(|| EngineError::Spawner {
                message: format!("zone vanished during spawn: {}", def.name),
            })?;
        for _ in 0..count {
            let kind = random_kind(&mut rng);
            let position = zone.random_position(&mut rng);
            businesses.push(Business::new(zone.id, position, kind));
        }
    }
    if businesses.is_empty() {
        return Err(EngineError::Spawner {
            message: "no businesses could be spawned; check zone business shares".to_owned(),
        });
    }

    // Persons, each with a random residence zone and assigned business.
    let mut people: Vec<Person> = Vec::new();
    for index in 0..config.population.people {
        let residence = network.random_zone(&mut rng)?;
        let business = businesses
            .get(rng.random_range(0..businesses.len()))
            .ok_or_else(|| EngineError::Spawner {
                message: "business index out of range".to_owned(),
            })?;
        let name = person_name(&mut rng, index);
        let age = rng.random_range(18..=65_u8);
        let experience = rng.random_range(0..=10_u32);
        let money = residence_welfare(&network, residence.id).sample(&mut rng);
        let person = Person::new(
            name, age, experience, residence, business, &network, money, &mut rng,
        )?;
        people.push(person);
    }

    let mut city = CityState::new(network, config.simulation.seed);
    for business in businesses {
        city.add_business(business);
    }
    for person in people {
        city.add_person(person)?;
    }
    info!(
        people = city.people.len(),
        businesses = city.businesses.len(),
        zones = city.network.zone_count(),
        "city spawned"
    );
    Ok(city)
}

fn random_kind(rng: &mut StdRng) -> BusinessKind {
    let index = rng.random_range(0..BusinessKind::ALL.len());
    BusinessKind::ALL
        .get(index)
        .copied()
        .unwrap_or(BusinessKind::Small)
}

fn person_name(rng: &mut StdRng, index: u32) -> String {
    let first = FIRST_NAMES
        .get(rng.random_range(0..FIRST_NAMES.len()))
        .copied()
        .unwrap_or("Ada");
    let last = SURNAMES
        .get(rng.random_range(0..SURNAMES.len()))
        .copied()
        .unwrap_or("Rossi");
    // The index keeps names unique across the population.
    format!("{first} {last} {index}")
}

fn residence_welfare(network: &TransportNetwork, zone_id: citylife_types::ZoneId) -> IncomeRange {
    network
        .zone(zone_id)
        .map_or(IncomeRange::new(0, 0), |z| z.welfare)
}
