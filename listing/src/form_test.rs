use super::*;
use crate::aspect::{Aspect, AspectMode, AspectUsage};
use crate::registry::fields_for;

fn funko_aspects() -> AspectGroups {
    let mut franchise = Aspect::new("Franchise", false, AspectUsage::Recommended);
    franchise.mode = AspectMode::SelectionOnly;
    franchise.allowed_values = vec!["Marvel".into(), "Star Wars".into()];
    AspectGroups::partition(vec![
        Aspect::new("Brand", true, AspectUsage::Required),
        Aspect::new("Character", true, AspectUsage::Required),
        franchise,
        Aspect::new("Theme", false, AspectUsage::Optional),
    ])
}

fn complete_form() -> ListingForm {
    let mut form = ListingForm {
        title: "Funko Pop! Marvel Guardians of the Galaxy Groot #49".into(),
        description: "Vaulted Groot in the original box.".into(),
        category: "Funko Pop".into(),
        category_id: "149372".into(),
        price: Some(24.99),
        ..ListingForm::default()
    };
    form.fields.insert("series".into(), "Pop! Marvel".into());
    form.fields.insert("number".into(), "49".into());
    form.fields.insert("boxCondition".into(), "Near Mint".into());
    form.fields.insert("vaulted".into(), "Yes".into());
    form.aspects.insert("Brand".into(), "Funko".into());
    form.aspects.insert("Character".into(), "Groot".into());
    form
}

fn fields_of(issues: &[ValidationIssue]) -> Vec<&str> {
    issues.iter().map(|i| i.field.as_str()).collect()
}

// =============================================================
// Defaults and seeding
// =============================================================

#[test]
fn default_form_uses_marketplace_defaults() {
    let form = ListingForm::default();
    assert_eq!(form.condition_id, "1000");
    assert_eq!(form.quantity, 1);
    assert_eq!(form.duration, ListingDuration::GoodTilCancelled);
    assert_eq!(form.shipping.shipping_type, ShippingType::Calculated);
    assert_eq!(form.format, ListingFormat::FixedPrice);
}

#[test]
fn from_product_seeds_form() {
    let product = ProductRecord {
        upc: "889698111930".into(),
        title: "x".repeat(100),
        description: Some("Bobblehead".into()),
        brand: Some("Funko".into()),
        category: Some("funko pop".into()),
        mpn: None,
        images: (0..15).map(|i| format!("https://img/{i}.jpg")).collect(),
        price: Some(12.0),
        quantity: 3,
        market_data: None,
    };
    let form = ListingForm::from_product(&product);
    assert_eq!(form.title.chars().count(), MAX_TITLE_CHARS);
    assert_eq!(form.category_id, "149372");
    assert_eq!(form.images.len(), MAX_IMAGES);
    assert_eq!(form.aspects.get("Brand").map(String::as_str), Some("Funko"));
    assert_eq!(form.quantity, 3);
    assert_eq!(form.upc, "889698111930");
}

#[test]
fn from_product_prices_from_market_summary_first() {
    let mut product = ProductRecord {
        upc: "889698111930".into(),
        title: "Groot".into(),
        description: None,
        brand: None,
        category: None,
        mpn: None,
        images: Vec::new(),
        price: Some(9.99),
        quantity: 1,
        market_data: Some(ScanMarketData { average_price: Some(14.5), ..ScanMarketData::default() }),
    };
    assert_eq!(ListingForm::from_product(&product).price, Some(14.5));

    product.market_data = Some(ScanMarketData::default());
    assert_eq!(ListingForm::from_product(&product).price, Some(9.99));
}

#[test]
fn copy_from_listing_keeps_category_and_merges_specifics() {
    let mut form = complete_form();
    let mut listing = ListingDetails {
        title: "Funko Pop Groot".into(),
        description: "Copied".into(),
        price: Some(30.0),
        condition_id: Some("9999".into()),
        quantity: Some(0),
        ..ListingDetails::default()
    };
    listing.item_specifics.insert("Theme".into(), "Movies".into());
    listing.item_specifics.insert("Character".into(), String::new());

    form.copy_from_listing(&listing);
    assert_eq!(form.title, "Funko Pop Groot");
    assert_eq!(form.category_id, "149372");
    assert_eq!(form.price, Some(30.0));
    assert_eq!(form.condition_id, "1000");
    assert_eq!(form.quantity, 1);
    assert_eq!(form.aspects["Theme"], "Movies");
    assert_eq!(form.aspects["Character"], "Groot");
}

// =============================================================
// Images
// =============================================================

#[test]
fn images_are_capped_and_deduplicated() {
    let mut form = ListingForm::default();
    for i in 0..MAX_IMAGES {
        assert!(form.add_image(&format!("https://img/{i}.jpg")));
    }
    assert!(!form.add_image("https://img/extra.jpg"));

    form.images.clear();
    assert!(form.add_image("https://img/a.jpg"));
    assert!(!form.add_image(" https://img/a.jpg "));
    assert!(!form.add_image("   "));
}

#[test]
fn images_reorder_and_remove() {
    let mut form = ListingForm::default();
    for url in ["a", "b", "c"] {
        form.add_image(url);
    }
    assert!(form.move_image(2, 0));
    assert_eq!(form.images, ["c", "a", "b"]);
    assert!(!form.move_image(0, 3));
    assert_eq!(form.remove_image(1).as_deref(), Some("a"));
    assert_eq!(form.remove_image(5), None);
    assert_eq!(form.images, ["c", "b"]);
}

// =============================================================
// Validation
// =============================================================

#[test]
fn complete_form_has_no_issues() {
    let issues = complete_form().validate(fields_for("Funko Pop"), &funko_aspects());
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn missing_required_field_and_aspect_are_reported() {
    let mut form = complete_form();
    form.fields.insert("number".into(), "  ".into());
    form.aspects.remove("Character");

    let issues = form.validate(fields_for("Funko Pop"), &funko_aspects());
    assert_eq!(fields_of(&issues), ["Pop Number", "Character"]);
    assert!(issues.iter().all(|i| i.message == "is required"));
}

#[test]
fn core_fields_are_checked() {
    let form = ListingForm {
        title: "t".repeat(81),
        subtitle: "s".repeat(56),
        condition_id: "42".into(),
        price: Some(0.0),
        quantity: 0,
        ..ListingForm::default()
    };
    let issues = form.validate(&[], &AspectGroups::default());
    assert_eq!(fields_of(&issues), ["title", "subtitle", "description", "category", "condition", "price", "quantity"]);
}

#[test]
fn field_kinds_are_checked() {
    let mut form = complete_form();
    form.fields.insert("yearReleased".into(), "nineteen".into());
    form.fields.insert("series".into(), "Pop! Unknown".into());

    let issues = form.validate(fields_for("Funko Pop"), &funko_aspects());
    assert_eq!(
        issues,
        [
            ValidationIssue::new("Series/Line", "must be one of the listed options"),
            ValidationIssue::new("Year Released", "must be a number"),
        ]
    );
}

#[test]
fn multiselect_values_must_be_listed() {
    let mut form = complete_form();
    form.fields.insert("features".into(), vec!["Bluetooth".to_owned(), "Telepathy".to_owned()].into());
    form.fields.insert("model".into(), "X1".into());
    let issues = form.validate(fields_for("Electronics"), &AspectGroups::default());
    assert_eq!(issues, [ValidationIssue::new("Features", "must only contain listed options")]);
}

#[test]
fn aspect_constraints_are_checked() {
    let mut form = complete_form();
    form.aspects.insert("Franchise".into(), "DC".into());
    let issues = form.validate(fields_for("Funko Pop"), &funko_aspects());
    assert_eq!(issues, [ValidationIssue::new("Franchise", "must be one of the listed values")]);
}

#[test]
fn shipping_numbers_must_parse() {
    let mut form = complete_form();
    form.shipping.weight_oz = "heavy".into();
    form.shipping.length = "12".into();
    let issues = form.validate(&[], &AspectGroups::default());
    assert_eq!(issues, [ValidationIssue::new("weight (oz)", "must be a number")]);
}

// =============================================================
// Payload
// =============================================================

#[test]
fn prepare_refuses_incomplete_forms() {
    let form = ListingForm::default();
    assert!(form.prepare(&[], &AspectGroups::default()).is_err());
}

#[test]
fn prepare_builds_ordered_item_specifics() {
    let mut form = complete_form();
    form.aspects.insert("Vinyl Type".into(), "Standard".into());
    form.aspects.insert("Theme".into(), "  ".into());
    form.shipping.weight_lbs = "1.5".into();

    let payload = form.prepare(fields_for("Funko Pop"), &funko_aspects()).expect("payload");
    let names: Vec<&str> = payload.item_specifics.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Brand", "Character", "Vinyl Type"]);
    assert_eq!(payload.shipping.weight_lbs, Some(1.5));
    assert_eq!(payload.shipping.cost, None);
    assert_eq!(payload.price, 24.99);
    assert_eq!(payload.subtitle, None);
}

#[test]
fn payload_serializes_marketplace_codes() {
    let payload = complete_form().prepare(fields_for("Funko Pop"), &funko_aspects()).expect("payload");
    let json = serde_json::to_value(&payload).expect("json");
    assert_eq!(json["duration"], "GTC");
    assert_eq!(json["format"], "FixedPrice");
    assert_eq!(json["condition_id"], "1000");
    assert_eq!(json["shipping"], serde_json::json!({"shipping_type": "calculated"}));
    assert_eq!(json["item_specifics"][0], serde_json::json!({"name": "Brand", "value": "Funko"}));
    assert_eq!(json["category_fields"]["number"], "49");
    assert!(json.get("subtitle").is_none());
}

#[test]
fn field_values_read_both_wire_shapes() {
    let one: FieldValue = serde_json::from_str(r#""Mint""#).expect("one");
    let many: FieldValue = serde_json::from_str(r#"["Wi-Fi","5G"]"#).expect("many");
    assert_eq!(one, FieldValue::One("Mint".into()));
    assert!(many.contains("5G"));
    assert_eq!(many.display(), "Wi-Fi, 5G");
    assert!(FieldValue::Many(Vec::new()).is_empty());
}

#[test]
fn suggestion_request_skips_blank_context() {
    let mut form = complete_form();
    form.brand = "Funko".into();
    let request = form.suggestion_request();
    assert_eq!(request.category_id, "149372");
    assert_eq!(request.context.brand.as_deref(), Some("Funko"));
    assert_eq!(request.context.upc, None);
    assert_eq!(request.context.category.as_deref(), Some("Funko Pop"));
}
