use super::*;
use crate::fake_api::FakeApi;

fn scored(name: &str, value: &str, confidence: f64) -> Suggestion {
    Suggestion::new(name, value, confidence, SuggestionSource::Title)
}

fn request() -> SuggestionRequest {
    SuggestionRequest {
        category_id: "149372".into(),
        context: SuggestionContext { title: Some("Funko Pop Groot #49".into()), ..SuggestionContext::default() },
    }
}

// =============================================================
// Suggestion
// =============================================================

#[test]
fn confidence_is_clamped_and_rounded() {
    assert_eq!(scored("Brand", "Funko", 1.7).confidence, 1.0);
    assert_eq!(scored("Brand", "Funko", -0.2).confidence, 0.0);
    assert_eq!(scored("Brand", "Funko", f64::NAN).confidence, 0.0);
    assert_eq!(scored("Brand", "Funko", 0.875).confidence_percent(), 88);
}

#[test]
fn high_confidence_is_strictly_above_threshold() {
    assert!(!scored("Brand", "Funko", 0.7).is_high_confidence());
    assert!(scored("Brand", "Funko", 0.71).is_high_confidence());
}

#[test]
fn source_labels() {
    assert_eq!(SuggestionSource::Title.label(), "From Title");
    assert_eq!(SuggestionSource::Description.label(), "From Description");
    assert_eq!(SuggestionSource::PreviousValues.label(), "From History");
    assert_eq!(SuggestionSource::AiGenerated.label(), "AI Generated");
}

// =============================================================
// Request body
// =============================================================

#[test]
fn request_skips_missing_context_fields() {
    let json = serde_json::to_value(request()).expect("json");
    assert_eq!(
        json,
        serde_json::json!({
            "category_id": "149372",
            "context": { "title": "Funko Pop Groot #49" }
        })
    );
}

// =============================================================
// decode_suggestions / decode_single
// =============================================================

#[test]
fn decode_accepts_plain_and_scored_entries() {
    let body = r#"{
        "Brand": "Funko",
        "Character": {"value": "Groot", "confidence": 0.92, "source": "title"},
        "Theme": {"value": "Movies", "source": "something_else"},
        "Series": "",
        "Features": null
    }"#;
    let map = decode_suggestions(body).expect("map");
    assert_eq!(map.len(), 3);

    let brand = &map["Brand"];
    assert_eq!(brand.value, "Funko");
    assert_eq!(brand.confidence, 0.0);
    assert_eq!(brand.source, SuggestionSource::AiGenerated);

    let character = &map["Character"];
    assert_eq!(character.aspect_name, "Character");
    assert_eq!(character.source, SuggestionSource::Title);
    assert_eq!(character.confidence_percent(), 92);

    assert_eq!(map["Theme"].source, SuggestionSource::AiGenerated);
}

#[test]
fn decode_rejects_non_objects() {
    assert!(matches!(decode_suggestions("[1,2]"), Err(ApiError::Parse(_))));
    assert!(matches!(decode_suggestions("not json"), Err(ApiError::Parse(_))));
}

#[test]
fn decode_single_distinguishes_missing_from_empty() {
    let hit = decode_single(r#"{"Brand":"Funko"}"#, "Brand").expect("ok");
    assert_eq!(hit.map(|s| s.value), Some("Funko".to_owned()));

    assert_eq!(decode_single(r#"{"Brand":""}"#, "Brand"), Ok(None));
    assert_eq!(decode_single(r#"{"Color":"Green"}"#, "Brand"), Err(ApiError::MissingData("Brand".into())));
}

// =============================================================
// merge
// =============================================================

#[test]
fn merge_overwrites_per_key_and_keeps_the_rest() {
    let mut target = SuggestionMap::new();
    target.insert("Brand".into(), scored("Brand", "Fnko", 0.3));
    target.insert("Color".into(), scored("Color", "Green", 0.6));

    let mut incoming = SuggestionMap::new();
    incoming.insert("Brand".into(), scored("Brand", "Funko", 0.9));
    incoming.insert("Theme".into(), scored("Theme", "Movies", 0.5));
    merge_suggestions(&mut target, incoming);

    assert_eq!(target.len(), 3);
    assert_eq!(target["Brand"].value, "Funko");
    assert_eq!(target["Color"].value, "Green");
    assert_eq!(target["Theme"].value, "Movies");
}

#[test]
fn apply_single_touches_only_its_key() {
    let mut target = SuggestionMap::new();
    target.insert("Brand".into(), scored("Brand", "Funko", 0.9));
    target.insert("Color".into(), scored("Color", "Green", 0.6));
    let before = target.clone();

    apply_single(&mut target, "Color", Some(scored("Color", "Brown", 0.8)));
    assert_eq!(target["Brand"], before["Brand"]);
    assert_eq!(target["Color"].value, "Brown");

    apply_single(&mut target, "Color", None);
    assert!(!target.contains_key("Color"));
    assert_eq!(target["Brand"], before["Brand"]);
}

#[test]
fn later_single_result_wins() {
    let mut target = SuggestionMap::new();
    apply_single(&mut target, "Brand", Some(scored("Brand", "first", 0.4)));
    apply_single(&mut target, "Brand", Some(scored("Brand", "second", 0.4)));
    assert_eq!(target["Brand"].value, "second");
}

// =============================================================
// fetch_all / fetch_one
// =============================================================

#[tokio::test]
async fn fetch_all_merges_into_target() {
    let api = FakeApi::default()
        .with_suggestion(scored("Brand", "Funko", 0.9))
        .with_suggestion(scored("Character", "Groot", 0.8));
    let mut target = SuggestionMap::new();
    target.insert("Color".into(), scored("Color", "Brown", 0.5));

    let count = fetch_all(&api, &request(), &mut target).await.expect("fetch");
    assert_eq!(count, 2);
    assert_eq!(target.len(), 3);
    assert_eq!(api.calls(), ["suggest_all:149372"]);
}

#[tokio::test]
async fn fetch_all_failure_leaves_target_untouched() {
    let api = FakeApi::default().with_suggest_error(ApiError::Transport("offline".into()));
    let mut target = SuggestionMap::new();
    target.insert("Color".into(), scored("Color", "Brown", 0.5));
    let before = target.clone();

    assert!(fetch_all(&api, &request(), &mut target).await.is_err());
    assert_eq!(target, before);
}

#[tokio::test]
async fn fetch_one_updates_only_that_aspect() {
    let api = FakeApi::default().with_suggestion(scored("Brand", "Funko", 0.95));
    let mut target = SuggestionMap::new();
    target.insert("Brand".into(), scored("Brand", "old", 0.1));
    target.insert("Color".into(), scored("Color", "Brown", 0.5));

    let got = fetch_one(&api, "Brand", &request(), &mut target).await.expect("fetch");
    assert_eq!(got.map(|s| s.value), Some("Funko".to_owned()));
    assert_eq!(target["Brand"].value, "Funko");
    assert_eq!(target["Color"].value, "Brown");
    assert_eq!(api.calls(), ["suggest_one:Brand"]);
}
