use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "Iron", "Crimson", "Silent", "Rogue", "Amber", "Frozen", "Stray", "Violet",
    "Rapid", "Dusty", "Feral", "Hollow", "Lucky", "Grim", "Solar", "Stark",
];

const CALLSIGNS: &[&str] = &[
    "Vanguard", "Lancer", "Warden", "Specter", "Nomad", "Reaper", "Pilgrim", "Sentry",
    "Harrier", "Bastion", "Corsair", "Drifter", "Marauder", "Outrider", "Paladin", "Striker",
];

pub fn generate_player_name() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let callsign = CALLSIGNS[rng.random_range(0..CALLSIGNS.len())];
    format!("{}{}", adjective, callsign)
}
