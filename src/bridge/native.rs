//! Names and descriptions of the dynamic effects bridges run natively
//! (firmware-side, no streaming involved).

pub const NO_EFFECT: &str = "no_effect";
pub const CANDLE: &str = "candle";
pub const FIRE: &str = "fire";
pub const PRISM: &str = "prism";
pub const SPARKLE: &str = "sparkle";
pub const OPAL: &str = "opal";
pub const GLISTEN: &str = "glisten";
pub const UNDERWATER: &str = "underwater";
pub const COSMOS: &str = "cosmos";
pub const SUNBEAM: &str = "sunbeam";
pub const ENCHANT: &str = "enchant";

pub fn all() -> &'static [&'static str] {
    &[
        NO_EFFECT, CANDLE, FIRE, PRISM, SPARKLE, OPAL, GLISTEN, UNDERWATER, COSMOS, SUNBEAM,
        ENCHANT,
    ]
}

pub fn is_valid(effect: &str) -> bool {
    all().contains(&effect)
}

pub fn description(effect: &str) -> &'static str {
    match effect {
        NO_EFFECT => "No effect",
        CANDLE => "Simulates a flickering candle",
        FIRE => "Simulates a cozy fireplace",
        PRISM => "Prism color effects",
        SPARKLE => "Sparkling light effect",
        OPAL => "Opal color shifts",
        GLISTEN => "Glistening light effect",
        UNDERWATER => "Underwater bubble effect",
        COSMOS => "Cosmic space effect",
        SUNBEAM => "Warm sunbeam effect",
        ENCHANT => "Magical enchanted effect",
        _ => "Unknown effect",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_matches_the_table() {
        for effect in all() {
            assert!(is_valid(effect));
        }
        assert!(!is_valid("disco"));
        assert_eq!(description("disco"), "Unknown effect");
    }
}
