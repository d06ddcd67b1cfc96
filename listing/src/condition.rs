//! Marketplace item conditions.

/// A condition the seller can pick for an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Condition {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// Condition selected for a fresh listing form.
pub const DEFAULT_CONDITION_ID: &str = "1000";

pub const CONDITIONS: &[Condition] = &[
    Condition {
        id: "1000",
        label: "New",
        description: "A brand-new, unused, unopened, undamaged item in its original packaging",
    },
    Condition { id: "1500", label: "New other", description: "New without tags or original packaging" },
    Condition { id: "1750", label: "New with defects", description: "New with defects or flaws" },
    Condition {
        id: "2000",
        label: "Certified Refurbished",
        description: "Restored to working order by manufacturer or manufacturer-approved vendor",
    },
    Condition { id: "2500", label: "Excellent - Refurbished", description: "Fully restored to working order" },
    Condition { id: "3000", label: "Very Good", description: "Minor wear, fully functional" },
    Condition { id: "4000", label: "Good", description: "Moderate wear, fully functional" },
    Condition { id: "5000", label: "Acceptable", description: "Heavy wear, but still works" },
    Condition {
        id: "6000",
        label: "For parts or not working",
        description: "Not fully functional, for parts or repair",
    },
];

/// Look up a condition by id.
#[must_use]
pub fn condition(id: &str) -> Option<&'static Condition> {
    CONDITIONS.iter().find(|c| c.id == id)
}
