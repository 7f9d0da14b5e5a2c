use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusArea {
    CavityDetection,
    BoneDensity,
    RootCanalAssessment,
    PeriodontalStatus,
    WisdomTeeth,
    OverallAssessment,
}

impl FocusArea {
    pub const ALL: &'static [FocusArea] = &[
        FocusArea::CavityDetection,
        FocusArea::BoneDensity,
        FocusArea::RootCanalAssessment,
        FocusArea::PeriodontalStatus,
        FocusArea::WisdomTeeth,
        FocusArea::OverallAssessment,
    ];
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FocusArea::CavityDetection => "Cavity Detection",
            FocusArea::BoneDensity => "Bone Density",
            FocusArea::RootCanalAssessment => "Root Canal Assessment",
            FocusArea::PeriodontalStatus => "Periodontal Status",
            FocusArea::WisdomTeeth => "Wisdom Teeth",
            FocusArea::OverallAssessment => "Overall Assessment",
        })
    }
}

/// Focus areas in the order the user picked them, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusSelection {
    areas: Vec<FocusArea>,
}

impl FocusSelection {
    pub fn contains(&self, area: FocusArea) -> bool {
        self.areas.contains(&area)
    }

    pub fn set(&mut self, area: FocusArea, selected: bool) {
        match (selected, self.contains(area)) {
            (true, false) => self.areas.push(area),
            (false, true) => self.areas.retain(|existing| *existing != area),
            _ => {}
        }
    }

    pub fn areas(&self) -> &[FocusArea] {
        &self.areas
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

impl FromIterator<FocusArea> for FocusSelection {
    fn from_iter<T: IntoIterator<Item = FocusArea>>(iter: T) -> Self {
        let mut selection = Self::default();
        for area in iter {
            selection.set(area, true);
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_selection_order() {
        let mut selection = FocusSelection::default();
        selection.set(FocusArea::WisdomTeeth, true);
        selection.set(FocusArea::CavityDetection, true);
        assert_eq!(
            selection.areas(),
            &[FocusArea::WisdomTeeth, FocusArea::CavityDetection]
        );
    }

    #[test]
    fn ignores_duplicates_and_removes() {
        let mut selection: FocusSelection =
            [FocusArea::BoneDensity, FocusArea::BoneDensity].into_iter().collect();
        assert_eq!(selection.areas().len(), 1);

        selection.set(FocusArea::BoneDensity, false);
        assert!(selection.is_empty());

        selection.set(FocusArea::BoneDensity, false);
        assert!(selection.is_empty());
    }

    #[test]
    fn labels_match_form_options() {
        assert_eq!(FocusArea::RootCanalAssessment.to_string(), "Root Canal Assessment");
        assert_eq!(FocusArea::ALL.len(), 6);
    }
}
