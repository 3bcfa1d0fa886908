use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of a non-covalent interaction between two features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum InteractionType {
    #[default]
    Unknown,
    Ionic,
    CationPi,
    PiStacking,
    HydrogenBond,
    HalogenBond,
    Hydrophobic,
    MetalCoordination,
    WeakHydrogenBond,
}

/// Chemical feature an atom or atom group contributes to interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FeatureType {
    #[default]
    None,
    PositiveCharge,
    NegativeCharge,
    AromaticRing,
    HydrogenDonor,
    HydrogenAcceptor,
    HalogenDonor,
    HalogenAcceptor,
    HydrophobicAtom,
    WeakHydrogenDonor,
    IonicTypePartner,
    DativeBondPartner,
    TransitionMetal,
    IonicTypeMetal,
}

/// Functional group a feature was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FeatureGroup {
    #[default]
    None,
    QuaternaryAmine,
    TertiaryAmine,
    Sulfonium,
    SulfonicAcid,
    Sulfate,
    Phosphate,
    Halocarbon,
    Guanidine,
    Acetamidine,
    Carboxylate,
}

static INTERACTION_TYPES: Map<&'static str, InteractionType> = phf_map! {
    "unknown" => InteractionType::Unknown,
    "ionic" => InteractionType::Ionic,
    "cation-pi" => InteractionType::CationPi,
    "pi-stacking" => InteractionType::PiStacking,
    "hydrogen-bond" => InteractionType::HydrogenBond,
    "halogen-bond" => InteractionType::HalogenBond,
    "hydrophobic" => InteractionType::Hydrophobic,
    "metal-coordination" => InteractionType::MetalCoordination,
    "weak-hydrogen-bond" => InteractionType::WeakHydrogenBond,
};

static FEATURE_TYPES: Map<&'static str, FeatureType> = phf_map! {
    "none" => FeatureType::None,
    "positive-charge" => FeatureType::PositiveCharge,
    "negative-charge" => FeatureType::NegativeCharge,
    "aromatic-ring" => FeatureType::AromaticRing,
    "hydrogen-donor" => FeatureType::HydrogenDonor,
    "hydrogen-acceptor" => FeatureType::HydrogenAcceptor,
    "halogen-donor" => FeatureType::HalogenDonor,
    "halogen-acceptor" => FeatureType::HalogenAcceptor,
    "hydrophobic-atom" => FeatureType::HydrophobicAtom,
    "weak-hydrogen-donor" => FeatureType::WeakHydrogenDonor,
    "ionic-type-partner" => FeatureType::IonicTypePartner,
    "dative-bond-partner" => FeatureType::DativeBondPartner,
    "transition-metal" => FeatureType::TransitionMetal,
    "ionic-type-metal" => FeatureType::IonicTypeMetal,
};

static FEATURE_GROUPS: Map<&'static str, FeatureGroup> = phf_map! {
    "none" => FeatureGroup::None,
    "quaternary-amine" => FeatureGroup::QuaternaryAmine,
    "tertiary-amine" => FeatureGroup::TertiaryAmine,
    "sulfonium" => FeatureGroup::Sulfonium,
    "sulfonic-acid" => FeatureGroup::SulfonicAcid,
    "sulfate" => FeatureGroup::Sulfate,
    "phosphate" => FeatureGroup::Phosphate,
    "halocarbon" => FeatureGroup::Halocarbon,
    "guanidine" => FeatureGroup::Guanidine,
    "acetamidine" => FeatureGroup::Acetamidine,
    "carboxylate" => FeatureGroup::Carboxylate,
};

impl InteractionType {
    pub const ALL: [InteractionType; 9] = [
        InteractionType::Unknown,
        InteractionType::Ionic,
        InteractionType::CationPi,
        InteractionType::PiStacking,
        InteractionType::HydrogenBond,
        InteractionType::HalogenBond,
        InteractionType::Hydrophobic,
        InteractionType::MetalCoordination,
        InteractionType::WeakHydrogenBond,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InteractionType::Unknown => "unknown",
            InteractionType::Ionic => "ionic",
            InteractionType::CationPi => "cation-pi",
            InteractionType::PiStacking => "pi-stacking",
            InteractionType::HydrogenBond => "hydrogen-bond",
            InteractionType::HalogenBond => "halogen-bond",
            InteractionType::Hydrophobic => "hydrophobic",
            InteractionType::MetalCoordination => "metal-coordination",
            InteractionType::WeakHydrogenBond => "weak-hydrogen-bond",
        }
    }

    /// Feature pairs (in either order) that form this interaction.
    pub fn feature_pairs(&self) -> &'static [(FeatureType, FeatureType)] {
        use FeatureType as F;
        match self {
            InteractionType::Unknown => &[],
            InteractionType::Ionic => &[(F::PositiveCharge, F::NegativeCharge)],
            InteractionType::CationPi => &[(F::PositiveCharge, F::AromaticRing)],
            InteractionType::PiStacking => &[(F::AromaticRing, F::AromaticRing)],
            InteractionType::HydrogenBond => &[(F::HydrogenDonor, F::HydrogenAcceptor)],
            InteractionType::HalogenBond => &[(F::HalogenDonor, F::HalogenAcceptor)],
            InteractionType::Hydrophobic => &[(F::HydrophobicAtom, F::HydrophobicAtom)],
            InteractionType::MetalCoordination => &[
                (F::TransitionMetal, F::DativeBondPartner),
                (F::IonicTypeMetal, F::IonicTypePartner),
            ],
            InteractionType::WeakHydrogenBond => &[(F::WeakHydrogenDonor, F::HydrogenAcceptor)],
        }
    }

    /// The interaction two features can form, if any.
    pub fn between(a: FeatureType, b: FeatureType) -> Option<InteractionType> {
        Self::ALL.into_iter().find(|interaction| {
            interaction
                .feature_pairs()
                .iter()
                .any(|&(x, y)| (x, y) == (a, b) || (x, y) == (b, a))
        })
    }
}

impl FeatureType {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureType::None => "none",
            FeatureType::PositiveCharge => "positive-charge",
            FeatureType::NegativeCharge => "negative-charge",
            FeatureType::AromaticRing => "aromatic-ring",
            FeatureType::HydrogenDonor => "hydrogen-donor",
            FeatureType::HydrogenAcceptor => "hydrogen-acceptor",
            FeatureType::HalogenDonor => "halogen-donor",
            FeatureType::HalogenAcceptor => "halogen-acceptor",
            FeatureType::HydrophobicAtom => "hydrophobic-atom",
            FeatureType::WeakHydrogenDonor => "weak-hydrogen-donor",
            FeatureType::IonicTypePartner => "ionic-type-partner",
            FeatureType::DativeBondPartner => "dative-bond-partner",
            FeatureType::TransitionMetal => "transition-metal",
            FeatureType::IonicTypeMetal => "ionic-type-metal",
        }
    }
}

impl FeatureGroup {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureGroup::None => "none",
            FeatureGroup::QuaternaryAmine => "quaternary-amine",
            FeatureGroup::TertiaryAmine => "tertiary-amine",
            FeatureGroup::Sulfonium => "sulfonium",
            FeatureGroup::SulfonicAcid => "sulfonic-acid",
            FeatureGroup::Sulfate => "sulfate",
            FeatureGroup::Phosphate => "phosphate",
            FeatureGroup::Halocarbon => "halocarbon",
            FeatureGroup::Guanidine => "guanidine",
            FeatureGroup::Acetamidine => "acetamidine",
            FeatureGroup::Carboxylate => "carboxylate",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown {kind} name: '{name}'")]
pub struct ParseNameError {
    kind: &'static str,
    name: String,
}

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

impl FromStr for InteractionType {
    type Err = ParseNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        INTERACTION_TYPES
            .get(normalize(s).as_str())
            .copied()
            .ok_or_else(|| ParseNameError {
                kind: "interaction type",
                name: s.to_string(),
            })
    }
}

impl FromStr for FeatureType {
    type Err = ParseNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FEATURE_TYPES
            .get(normalize(s).as_str())
            .copied()
            .ok_or_else(|| ParseNameError {
                kind: "feature type",
                name: s.to_string(),
            })
    }
}

impl FromStr for FeatureGroup {
    type Err = ParseNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FEATURE_GROUPS
            .get(normalize(s).as_str())
            .copied()
            .ok_or_else(|| ParseNameError {
                kind: "feature group",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
