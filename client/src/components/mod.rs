pub mod bulk_editor;
pub mod category_fields;
pub mod item_specifics_form;
pub mod listing_form;
pub mod market_panel;
pub mod notice_banner;
pub mod upc_scanner;
