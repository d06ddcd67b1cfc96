//! Static registry of category-specific form fields.
//!
//! Category-specific fields are UI-only inputs shown for a chosen product
//! category. They are distinct from marketplace aspects, which are fetched
//! per category at runtime (see [`crate::aspect`]).
//!
//! Lookups hand out `&'static` slices, so field order is fixed at compile
//! time and nothing a caller does to form values can reorder or alter them.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use serde::Serialize;

/// Input control used to render a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Select,
    Multiselect,
}

/// One category-specific form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub required: bool,
    /// Choices for select/multiselect fields; empty otherwise.
    pub options: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
}

impl FieldDescriptor {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Self {
        Self { name, label, kind, required, options: &[], unit: None }
    }

    const fn with_options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    const fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Whether the field takes a list of values.
    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.kind == FieldKind::Multiselect
    }
}

const fn text(name: &'static str, label: &'static str, required: bool) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Text, required)
}

const fn number(name: &'static str, label: &'static str, required: bool) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Number, required)
}

const fn select(
    name: &'static str,
    label: &'static str,
    required: bool,
    options: &'static [&'static str],
) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Select, required).with_options(options)
}

const fn multiselect(
    name: &'static str,
    label: &'static str,
    required: bool,
    options: &'static [&'static str],
) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Multiselect, required).with_options(options)
}

// =============================================================================
// CATEGORIES
// =============================================================================

const ELECTRONICS: &[FieldDescriptor] = &[
    text("model", "Model", true),
    multiselect(
        "features",
        "Features",
        false,
        &["Bluetooth", "Wi-Fi", "USB-C", "Wireless Charging", "5G", "4K", "HDR"],
    ),
    number("screenSize", "Screen Size", false).with_unit("inches"),
    select(
        "storage",
        "Storage Capacity",
        false,
        &["16GB", "32GB", "64GB", "128GB", "256GB", "512GB", "1TB", "2TB"],
    ),
    multiselect(
        "connectivity",
        "Connectivity",
        false,
        &["Wi-Fi", "Bluetooth", "NFC", "4G LTE", "5G", "Ethernet"],
    ),
];

const FUNKO_POP: &[FieldDescriptor] = &[
    select(
        "series",
        "Series/Line",
        true,
        &[
            "Pop!",
            "Pop! Rides",
            "Pop! Movies",
            "Pop! Animation",
            "Pop! Games",
            "Pop! Disney",
            "Pop! Marvel",
            "Pop! DC",
            "Pop! Star Wars",
            "Pop! Television",
            "Pop! Sports",
            "Pop! Rocks",
            "Pop! Ad Icons",
            "Soda",
            "Pop! Deluxe",
        ],
    ),
    text("number", "Pop Number", true),
    select(
        "exclusive",
        "Exclusive To",
        false,
        &[
            "None",
            "Hot Topic",
            "BoxLunch",
            "Target",
            "Walmart",
            "Amazon",
            "GameStop",
            "FYE",
            "Funko Shop",
            "Convention Exclusive",
            "Chase",
            "Other",
        ],
    ),
    select(
        "variant",
        "Variant Type",
        false,
        &[
            "Regular",
            "Chase",
            "Flocked",
            "Glow in the Dark",
            "Metallic",
            "Diamond Collection",
            "Chrome",
            "Glitter",
            "Scented",
            "Black Light",
        ],
    ),
    select("boxCondition", "Box Condition", true, &["Mint", "Near Mint", "Good", "Fair", "Poor", "No Box"]),
    text("boxDamage", "Box Damage Description", false),
    number("yearReleased", "Year Released", false),
    select("vaulted", "Vaulted", true, &["Yes", "No"]),
];

const CLOTHING: &[FieldDescriptor] = &[
    select("gender", "Gender", true, &["Men", "Women", "Unisex", "Boys", "Girls"]),
    select("size", "Size", true, &["XXS", "XS", "S", "M", "L", "XL", "2XL", "3XL", "4XL", "5XL"]),
    select(
        "sizeType",
        "Size Type",
        false,
        &["Regular", "Petite", "Plus", "Juniors", "Maternity", "Big & Tall"],
    ),
    select(
        "color",
        "Primary Color",
        true,
        &[
            "Black", "White", "Red", "Blue", "Green", "Yellow", "Purple", "Pink", "Orange", "Brown", "Gray", "Navy",
            "Beige", "Multi",
        ],
    ),
    multiselect(
        "material",
        "Materials",
        true,
        &[
            "Cotton", "Polyester", "Wool", "Silk", "Linen", "Leather", "Denim", "Spandex", "Nylon", "Rayon",
            "Cashmere", "Bamboo",
        ],
    ),
    select(
        "style",
        "Style",
        false,
        &[
            "Casual",
            "Formal",
            "Business",
            "Athletic",
            "Streetwear",
            "Vintage",
            "Designer",
            "Basic",
            "Bohemian",
            "Gothic",
            "Preppy",
        ],
    ),
    multiselect("season", "Season", false, &["Spring", "Summer", "Fall", "Winter", "All Season"]),
    multiselect(
        "care",
        "Care Instructions",
        false,
        &[
            "Machine Wash",
            "Hand Wash",
            "Dry Clean",
            "Spot Clean",
            "Line Dry",
            "Tumble Dry",
            "Do Not Bleach",
            "Iron Low",
        ],
    ),
    text("measurements", "Measurements", false),
    text("defects", "Defects/Wear", false),
];

const BOOKS: &[FieldDescriptor] = &[
    text("isbn", "ISBN", true),
    select("format", "Format", true, &["Hardcover", "Paperback", "eBook", "Audiobook"]),
    text("language", "Language", true),
    text("publisher", "Publisher", true),
    number("publicationYear", "Publication Year", true),
];

const SPORTS_EQUIPMENT: &[FieldDescriptor] = &[
    text("sport", "Sport", true),
    select("skillLevel", "Skill Level", false, &["Beginner", "Intermediate", "Advanced", "Professional"]),
    select("ageGroup", "Age Group", false, &["Youth", "Adult", "Senior"]),
    text("material", "Material", false),
];

const AUTOMOTIVE: &[FieldDescriptor] = &[
    text("make", "Make", true),
    text("model", "Model", true),
    number("year", "Year", true),
    text("partNumber", "Part Number", true),
    text("compatibility", "Compatibility", false),
];

static REGISTRY: &[(&str, &[FieldDescriptor])] = &[
    ("Electronics", ELECTRONICS),
    ("Funko Pop", FUNKO_POP),
    ("Clothing", CLOTHING),
    ("Books", BOOKS),
    ("Sports Equipment", SPORTS_EQUIPMENT),
    ("Automotive", AUTOMOTIVE),
];

// =============================================================================
// LOOKUP
// =============================================================================

/// Ordered field list for `category`, or an empty slice if unknown.
#[must_use]
pub fn fields_for(category: &str) -> &'static [FieldDescriptor] {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, fields)| *fields)
        .unwrap_or_default()
}

/// Look up a single field of `category` by name.
#[must_use]
pub fn field(category: &str, name: &str) -> Option<&'static FieldDescriptor> {
    fields_for(category).iter().find(|f| f.name == name)
}

/// Category names with registered fields, in declaration order.
pub fn categories() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}
