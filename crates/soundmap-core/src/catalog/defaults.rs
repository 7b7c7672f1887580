//! Built-in fallback catalog.

use super::SoundCatalog;

/// `(library, category, sounds)` rows of the fallback catalog, in order.
const DEFAULT_LIBRARIES: &[(&str, &str, &[&str])] = &[
    ("CineSamples", "Strings", &["strings.violin.cinesamples", "strings.viola.cinesamples"]),
    ("CineSamples", "Woodwinds", &["woodwinds.flute.cinesamples", "woodwinds.oboe.cinesamples"]),
    ("CineSamples", "Brass", &["brass.trumpet.cinesamples", "brass.horn.cinesamples"]),
    (
        "CineSamples",
        "Percussion",
        &["percussion.timpani.cinesamples", "percussion.cymbals.cinesamples"],
    ),
    ("Orchestral Tools", "Strings", &["strings.violin.berlin", "strings.viola.berlin"]),
    ("Orchestral Tools", "Woodwinds", &["woodwinds.flute.berlin", "woodwinds.oboe.berlin"]),
    ("Orchestral Tools", "Brass", &["brass.trumpet.berlin", "brass.horn.berlin"]),
    ("Orchestral Tools", "Percussion", &["percussion.timpani.berlin", "percussion.cymbals.berlin"]),
    (
        "MS Basic",
        "Strings",
        &["strings.violin", "strings.viola", "strings.cello", "strings.contrabass"],
    ),
    (
        "MS Basic",
        "Woodwinds",
        &["woodwinds.flute", "woodwinds.oboe", "woodwinds.clarinet", "woodwinds.bassoon"],
    ),
    ("MS Basic", "Brass", &["brass.trumpet", "brass.horn", "brass.trombone", "brass.tuba"]),
    ("MS Basic", "Percussion", &["percussion.timpani", "percussion.snare", "percussion.bass"]),
    ("MS Basic", "Keyboard", &["piano", "harpsichord", "organ"]),
    (
        "Muse Strings",
        "Strings",
        &[
            "strings.violin.muse",
            "strings.viola.muse",
            "strings.cello.muse",
            "strings.contrabass.muse",
            "strings.ensemble.muse",
        ],
    ),
    (
        "Muse Choir",
        "Choir",
        &[
            "choir.soprano.muse",
            "choir.alto.muse",
            "choir.tenor.muse",
            "choir.bass.muse",
            "choir.mixed.muse",
        ],
    ),
    (
        "Muse Keys",
        "Keyboard",
        &[
            "piano.grand.muse",
            "piano.upright.muse",
            "piano.electric.muse",
            "harpsichord.muse",
            "organ.church.muse",
        ],
    ),
    (
        "SoundFonts",
        "Strings",
        &["strings.violin.sf", "strings.viola.sf", "strings.cello.sf", "strings.contrabass.sf"],
    ),
    (
        "SoundFonts",
        "Woodwinds",
        &["woodwinds.flute.sf", "woodwinds.oboe.sf", "woodwinds.clarinet.sf", "woodwinds.bassoon.sf"],
    ),
    ("SoundFonts", "Brass", &["brass.trumpet.sf", "brass.horn.sf", "brass.trombone.sf", "brass.tuba.sf"]),
    ("SoundFonts", "Percussion", &["percussion.timpani.sf", "percussion.snare.sf", "percussion.bass.sf"]),
    ("SoundFonts", "Keyboard", &["piano.sf", "harpsichord.sf", "organ.sf"]),
];

impl SoundCatalog {
    /// Build the hardcoded fallback catalog.
    pub fn build_default() -> Self {
        let mut catalog = Self::empty();
        for (library, category, sounds) in DEFAULT_LIBRARIES {
            catalog.add_sounds(library, category, sounds.iter().copied());
        }
        catalog
    }
}
