//! Mood presets for ambience generation.
//!
//! Each preset pairs a curated soundscape description with generation hints.
//! The table is static and read-only for the process lifetime; anything that
//! is not a preset name is treated as a literal free-form prompt.

use serde::Serialize;

/// Minimum length for a free-form prompt.
///
/// Non-preset input shorter than this is almost certainly a mistyped preset
/// name, so validation rejects it instead of sending it to a provider.
pub const MIN_CUSTOM_PROMPT_LEN: usize = 10;

/// Slug used in output filenames for free-form prompts.
pub const CUSTOM_SLUG: &str = "custom";

/// A mood preset for ambience generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodPreset {
    /// Unique preset key, also the filename slug.
    pub name: &'static str,
    /// One-line scene description.
    pub description: &'static str,
    /// Style adjectives fed to the provider.
    pub style_hints: &'static str,
    /// Tempo hint fed to the provider.
    pub suggested_tempo: &'static str,
    /// Rough perceived intensity, for the listing command.
    pub intensity: &'static str,
    /// Sound elements the scene is built from.
    pub elements: &'static [&'static str],
    /// Default duration in minutes when none is given.
    pub default_duration_min: u32,
}

impl MoodPreset {
    /// Composes the full generation prompt from the preset fields.
    pub fn prompt(&self) -> String {
        format!(
            "{}. Style: {}. Key elements: {}. Tempo: {}. \
             Create a seamless, loop-friendly ambient soundscape.",
            self.description,
            self.style_hints,
            self.elements.join(", "),
            self.suggested_tempo,
        )
    }
}

/// The preset library, in listing order.
pub static PRESETS: &[MoodPreset] = &[
    MoodPreset {
        name: "calm_rain_office",
        description: "Gentle rain falling outside a cozy office window",
        style_hints: "soft, atmospheric, minimal, calming",
        suggested_tempo: "very slow",
        intensity: "low",
        elements: &[
            "soft rain on glass",
            "distant thunder rumbles",
            "subtle keyboard clicks",
            "quiet air conditioning hum",
            "occasional paper rustling",
        ],
        default_duration_min: 2,
    },
    MoodPreset {
        name: "forest_cafe",
        description: "A peaceful cafe nestled in a forest clearing",
        style_hints: "organic, warm, natural, inviting",
        suggested_tempo: "slow",
        intensity: "low-medium",
        elements: &[
            "birdsong in trees",
            "gentle breeze through leaves",
            "distant cafe chatter",
            "coffee machine sounds",
            "wooden wind chimes",
            "stream trickling nearby",
        ],
        default_duration_min: 2,
    },
    MoodPreset {
        name: "deep_focus_spaceship",
        description: "The quiet hum of a spacecraft drifting through deep space",
        style_hints: "futuristic, minimal, droning, hypnotic",
        suggested_tempo: "static",
        intensity: "very low",
        elements: &[
            "engine resonance",
            "life support systems",
            "subtle electronic pulses",
            "distant star frequencies",
            "cabin pressurization",
            "control panel beeps",
        ],
        default_duration_min: 3,
    },
    MoodPreset {
        name: "ocean_meditation",
        description: "Waves gently lapping on a secluded beach at sunset",
        style_hints: "rhythmic, breathing, vast, peaceful",
        suggested_tempo: "very slow (wave rhythm)",
        intensity: "medium",
        elements: &[
            "ocean waves",
            "seagulls in distance",
            "sand shifting",
            "gentle wind",
            "underwater resonance",
            "shell sounds",
        ],
        default_duration_min: 2,
    },
    MoodPreset {
        name: "night_coding_lofi",
        description: "Late night coding session with lofi beats and city ambience",
        style_hints: "chill, nostalgic, urban, focused",
        suggested_tempo: "slow hip-hop beat",
        intensity: "medium",
        elements: &[
            "lofi hip-hop drums",
            "vinyl crackle",
            "jazz piano samples",
            "distant city traffic",
            "rain on window",
            "keyboard typing",
            "muted bass",
        ],
        default_duration_min: 2,
    },
];

/// Result of resolving a mood argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedMood<'a> {
    /// Input matched a preset key.
    Preset(&'a MoodPreset),
    /// Input is used verbatim as the generation prompt.
    Custom(&'a str),
}

impl<'a> ResolvedMood<'a> {
    /// Returns the full generation prompt.
    pub fn prompt(&self) -> String {
        match self {
            ResolvedMood::Preset(preset) => preset.prompt(),
            ResolvedMood::Custom(text) => (*text).to_string(),
        }
    }

    /// Returns the filename slug for this mood.
    pub fn slug(&self) -> &'static str {
        match self {
            ResolvedMood::Preset(preset) => preset.name,
            ResolvedMood::Custom(_) => CUSTOM_SLUG,
        }
    }

    /// Returns the default duration in minutes.
    pub fn default_duration_min(&self) -> u32 {
        match self {
            ResolvedMood::Preset(preset) => preset.default_duration_min,
            ResolvedMood::Custom(_) => 2,
        }
    }
}

/// Resolves a mood argument to a preset or a literal prompt.
///
/// Input matching a preset key returns that preset; anything else is a
/// free-form prompt. Resolution never fails; length validation happens in
/// the generator so listing and display code can resolve freely.
pub fn resolve(input: &str) -> ResolvedMood<'_> {
    match get_preset(input) {
        Some(preset) => ResolvedMood::Preset(preset),
        None => ResolvedMood::Custom(input),
    }
}

/// Returns a preset by name.
pub fn get_preset(name: &str) -> Option<&'static MoodPreset> {
    PRESETS.iter().find(|preset| preset.name == name)
}

/// Returns all presets in listing order.
pub fn list_presets() -> &'static [MoodPreset] {
    PRESETS
}

/// A serializable row for the `moods --json` listing.
#[derive(Debug, Serialize)]
pub struct MoodListing {
    pub name: &'static str,
    pub description: &'static str,
    pub intensity: &'static str,
    pub default_duration_min: u32,
}

impl From<&MoodPreset> for MoodListing {
    fn from(preset: &MoodPreset) -> Self {
        Self {
            name: preset.name,
            description: preset.description,
            intensity: preset.intensity,
            default_duration_min: preset.default_duration_min,
        }
    }
}
