use rand::seq::SliceRandom;

pub const FACTS: &[&str] = &[
    "Light from the Sun takes about eight minutes and twenty seconds to reach Earth.",
    "A day on Venus is longer than its year.",
    "The Andromeda Galaxy is on course to merge with the Milky Way in about 4.5 billion years.",
    "Neutron stars can spin hundreds of times per second.",
    "Olympus Mons on Mars is roughly two and a half times the height of Mount Everest.",
    "Saturn would float in a bathtub large enough to hold it; its mean density is below water's.",
    "The footprints left on the Moon by Apollo astronauts may last for millions of years.",
    "There are more stars in the observable universe than grains of sand on all of Earth's beaches.",
    "Jupiter's Great Red Spot is a storm wider than Earth that has raged for centuries.",
    "The cosmic microwave background is light released about 380,000 years after the Big Bang.",
];

#[derive(Debug, Default)]
pub struct FactRotation {
    last: Option<usize>,
}

impl FactRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_fact(&mut self) -> &'static str {
        let candidates: Vec<usize> = (0..FACTS.len())
            .filter(|idx| Some(*idx) != self.last || FACTS.len() == 1)
            .collect();
        let mut rng = rand::thread_rng();
        let idx = candidates.choose(&mut rng).copied().unwrap_or(0);
        self.last = Some(idx);
        FACTS[idx]
    }
}
