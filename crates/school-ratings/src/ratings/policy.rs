use serde::Serialize;

use super::components::ComponentKind;
use super::domain::Jurisdiction;

/// Share of the overall rating assigned to one component, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentWeight {
    pub kind: ComponentKind,
    pub weight: u8,
}

const fn weight(kind: ComponentKind, weight: u8) -> ComponentWeight {
    ComponentWeight { kind, weight }
}

/// England rates inspections, test results and attendance.
const ENGLAND_WEIGHTS: [ComponentWeight; 3] = [
    weight(ComponentKind::Ofsted, 30),
    weight(ComponentKind::Academic, 45),
    weight(ComponentKind::Attendance, 25),
];

/// No Ofsted outside England, so the component is left out altogether.
const DEVOLVED_WEIGHTS: [ComponentWeight; 2] = [
    weight(ComponentKind::Academic, 60),
    weight(ComponentKind::Attendance, 40),
];

const fn total(weights: &[ComponentWeight]) -> u32 {
    let mut sum = 0;
    let mut index = 0;
    while index < weights.len() {
        sum += weights[index].weight as u32;
        index += 1;
    }
    sum
}

const _: () = assert!(
    total(&ENGLAND_WEIGHTS) == 100,
    "England weights must sum to 100"
);
const _: () = assert!(
    total(&DEVOLVED_WEIGHTS) == 100,
    "devolved weights must sum to 100"
);

/// Component set and weight table for one jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JurisdictionPolicy {
    jurisdiction: Jurisdiction,
    weights: &'static [ComponentWeight],
}

impl JurisdictionPolicy {
    pub const fn for_jurisdiction(jurisdiction: Jurisdiction) -> Self {
        let weights: &'static [ComponentWeight] = match jurisdiction {
            Jurisdiction::England => &ENGLAND_WEIGHTS,
            Jurisdiction::Scotland | Jurisdiction::Other => &DEVOLVED_WEIGHTS,
        };
        Self {
            jurisdiction,
            weights,
        }
    }

    pub const fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    /// Components in rating order with their weights.
    pub const fn weights(&self) -> &'static [ComponentWeight] {
        self.weights
    }

    pub fn weight_of(&self, kind: ComponentKind) -> Option<u8> {
        self.weights
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.weight)
    }

    pub fn includes(&self, kind: ComponentKind) -> bool {
        self.weight_of(kind).is_some()
    }

    /// Science results only count where the England curriculum tests them.
    pub fn includes_science(&self) -> bool {
        self.jurisdiction == Jurisdiction::England
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn england_policy_weights_all_three_components() {
        let policy = JurisdictionPolicy::for_jurisdiction(Jurisdiction::England);
        assert_eq!(policy.weight_of(ComponentKind::Ofsted), Some(30));
        assert_eq!(policy.weight_of(ComponentKind::Academic), Some(45));
        assert_eq!(policy.weight_of(ComponentKind::Attendance), Some(25));
        assert!(policy.includes_science());
    }

    #[test]
    fn devolved_policies_exclude_ofsted_entirely() {
        for jurisdiction in [Jurisdiction::Scotland, Jurisdiction::Other] {
            let policy = JurisdictionPolicy::for_jurisdiction(jurisdiction);
            assert!(!policy.includes(ComponentKind::Ofsted));
            assert_eq!(policy.weights().len(), 2);
            assert_eq!(policy.weight_of(ComponentKind::Academic), Some(60));
            assert_eq!(policy.weight_of(ComponentKind::Attendance), Some(40));
            assert!(!policy.includes_science());
        }
    }

    #[test]
    fn every_policy_sums_to_one_hundred() {
        for jurisdiction in [
            Jurisdiction::England,
            Jurisdiction::Scotland,
            Jurisdiction::Other,
        ] {
            let policy = JurisdictionPolicy::for_jurisdiction(jurisdiction);
            let sum: u32 = policy.weights().iter().map(|entry| entry.weight as u32).sum();
            assert_eq!(sum, 100, "{jurisdiction:?}");
        }
    }
}
