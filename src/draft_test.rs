use listing::ApiError;
use listing::api::{BatchScanItem, CreatedListing, ListingDetails, ProductRecord};
use listing::aspect::Aspect;
use listing::form::ListingPayload;
use listing::market::{MarketData, MarketWindow};
use listing::suggestion::{Suggestion, SuggestionMap, SuggestionRequest};
use listing::template::TemplateData;

use super::*;

/// Backend with no aspects that refuses everything else.
struct OfflineApi;

fn offline() -> ApiError {
    ApiError::Transport("offline".to_owned())
}

#[async_trait::async_trait(?Send)]
impl ListingApi for OfflineApi {
    async fn scan_upc(&self, _: &ScanRequest) -> Result<ProductRecord, ApiError> {
        Err(offline())
    }

    async fn scan_batch(&self, _: &[ScanRequest]) -> Result<Vec<BatchScanItem>, ApiError> {
        Err(offline())
    }

    async fn fetch_aspects(&self, _: &str) -> Result<Vec<Aspect>, ApiError> {
        Ok(Vec::new())
    }

    async fn fetch_aspect_values(&self, _: &str, _: &str) -> Result<Vec<String>, ApiError> {
        Err(offline())
    }

    async fn suggest_all(&self, _: &SuggestionRequest) -> Result<SuggestionMap, ApiError> {
        Err(offline())
    }

    async fn suggest_one(&self, _: &str, _: &SuggestionRequest) -> Result<Option<Suggestion>, ApiError> {
        Err(offline())
    }

    async fn create_listing(&self, _: &ListingPayload) -> Result<CreatedListing, ApiError> {
        Err(offline())
    }

    async fn fetch_listing(&self, _: &str) -> Result<ListingDetails, ApiError> {
        Err(offline())
    }

    async fn fetch_template(&self, _: &str) -> Result<String, ApiError> {
        Err(offline())
    }

    async fn fill_template(&self, _: &str, _: &TemplateData) -> Result<String, ApiError> {
        Err(offline())
    }

    async fn fetch_market_data(&self, _: &str, _: MarketWindow) -> Result<MarketData, ApiError> {
        Err(offline())
    }
}

// =============================================================
// Argument parsing
// =============================================================

#[test]
fn key_value_splits_on_first_equals() {
    assert_eq!(parse_key_value("Character = Groot").unwrap(), ("Character".to_owned(), "Groot".to_owned()));
    assert_eq!(parse_key_value("Note=a=b").unwrap(), ("Note".to_owned(), "a=b".to_owned()));
    assert!(parse_key_value("Character").is_err());
    assert!(parse_key_value(" =Groot").is_err());
}

#[test]
fn multiselect_fields_take_lists() {
    assert_eq!(
        field_value("Clothing", "season", "Spring, Fall,"),
        FieldValue::Many(vec!["Spring".to_owned(), "Fall".to_owned()])
    );
    assert_eq!(field_value("Funko Pop", "number", "123"), FieldValue::One("123".to_owned()));
    assert_eq!(field_value("Unknown", "anything", "x"), FieldValue::One("x".to_owned()));
}

// =============================================================
// build_draft
// =============================================================

#[tokio::test]
async fn invalid_upc_fails_before_any_request() {
    let opts = DraftOptions { upc: Some("12345".to_owned()), ..DraftOptions::default() };
    let err = build_draft(&OfflineApi, &opts).await.unwrap_err();
    assert!(matches!(err, CliError::InvalidUpc(upc) if upc == "12345"));
}

#[tokio::test]
async fn scan_failure_is_reported() {
    let opts = DraftOptions { upc: Some("889698111930".to_owned()), ..DraftOptions::default() };
    let err = build_draft(&OfflineApi, &opts).await.unwrap_err();
    assert!(matches!(err, CliError::Api(ApiError::Transport(_))));
}

#[tokio::test]
async fn manual_draft_applies_every_input() {
    let opts = DraftOptions {
        title: Some("Funko Pop Groot".to_owned()),
        description: Some("Boxed".to_owned()),
        category: Some("Funko Pop".to_owned()),
        price: Some(14.99),
        quantity: Some(0),
        images: vec!["https://img.test/1.jpg".to_owned(), "https://img.test/1.jpg".to_owned()],
        fields: vec![("number".to_owned(), "49".to_owned())],
        aspects: vec![("Character".to_owned(), "Groot".to_owned())],
        ..DraftOptions::default()
    };
    let session = build_draft(&OfflineApi, &opts).await.unwrap();
    let form = session.form();

    assert_eq!(form.title, "Funko Pop Groot");
    assert_eq!(form.description, "Boxed");
    assert_eq!(form.category_id, "149372");
    assert_eq!(form.price, Some(14.99));
    assert_eq!(form.quantity, 1);
    assert_eq!(form.images, ["https://img.test/1.jpg"]);
    assert_eq!(form.fields.get("number"), Some(&FieldValue::One("49".to_owned())));
    assert_eq!(form.aspects.get("Character").map(String::as_str), Some("Groot"));
    assert!(session.aspects_loaded());
}

#[tokio::test]
async fn auto_fill_surfaces_suggestion_errors() {
    let opts = DraftOptions { category: Some("Funko Pop".to_owned()), auto_fill: Some(0.7), ..DraftOptions::default() };
    let err = build_draft(&OfflineApi, &opts).await.unwrap_err();
    assert!(matches!(err, CliError::Api(ApiError::Transport(_))));
}

#[tokio::test]
async fn description_fill_needs_a_template() {
    let opts = DraftOptions { category: Some("Books".to_owned()), fill_description: true, ..DraftOptions::default() };
    let err = build_draft(&OfflineApi, &opts).await.unwrap_err();
    assert!(matches!(err, CliError::NoTemplate(ref category) if category == "Books"), "{err}");

    let opts = DraftOptions { category: Some("Funko Pop".to_owned()), fill_description: true, ..DraftOptions::default() };
    let err = build_draft(&OfflineApi, &opts).await.unwrap_err();
    assert!(matches!(err, CliError::Api(ApiError::Transport(_))));
}
