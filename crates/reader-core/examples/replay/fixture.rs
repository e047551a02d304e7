#[derive(Clone, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Fixture {
    Lighthouse,
    Clockmaker,
    /// No sentence terminators at all; the whole text is one sentence.
    Breathless,
}

impl Fixture {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Lighthouse => {
                "The lighthouse keeper climbed the spiral stairs every evening. \
                 Two hundred and twelve steps, and she knew each one by heart. \
                 At the top she lit the lamp and watched the beam sweep the bay. \
                 Ships answered with their horns! Was there a finer job anywhere? \
                 She thought not."
            }
            Self::Clockmaker => {
                "In a narrow shop at the end of Harrow Lane, the clockmaker bent \
                 over his bench. Gears no larger than grains of rice lay in rows \
                 before him. Each tick he coaxed from brass and steel was a small \
                 victory over silence. The town set its mornings by his windows."
            }
            Self::Breathless => {
                "one long run of words with no terminator anywhere so the \
                 sentence highlight stretches across everything from the first \
                 word to the very last"
            }
        }
    }
}
