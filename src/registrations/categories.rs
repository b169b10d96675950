//! Standard field categories

use crate::registry::{CategoryCatalog, FieldCategory};

pub fn register(catalog: &CategoryCatalog) {
    catalog.register(FieldCategory::new(
        "basic",
        "Basic Fields",
        "Text, numbers and contact details",
        10,
    ));
    catalog.register(FieldCategory::new(
        "choice",
        "Choice Fields",
        "Pick one or more options from a list",
        20,
    ));
    catalog.register(FieldCategory::new(
        "datetime",
        "Date & Time",
        "Dates, times and timestamps",
        30,
    ));
    catalog.register(FieldCategory::new(
        "advanced",
        "Advanced",
        "Uploads and other specialised inputs",
        40,
    ));

    log::info!("Registered {} field categories", catalog.count());
}
