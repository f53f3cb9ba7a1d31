//! Option lists and default values offered when records are created.

/// Service categories an appointment can be booked for.
pub const APPOINTMENT_TITLES: [&str; 4] = [
    "Content Protection",
    "Brand Protection",
    "Media Management",
    "General Inquiry",
];

/// Service types a quotation can be priced for.
pub const SERVICE_TYPES: [&str; 4] = [
    "Content Protection",
    "Brand Protection",
    "Media Management",
    "General Service",
];

/// Contract periods a quotation can cover.
pub const PERIODS: [&str; 5] = ["3 Months", "6 Months", "12 Months", "24 Months", "One-time"];

/// Payment terms a quotation can offer.
pub const PAYMENT_TERMS: [&str; 4] = ["Net 30", "Net 60", "50% Upfront", "100% Upfront"];

/// Default appointment title.
pub const DEFAULT_TITLE: &str = APPOINTMENT_TITLES[0];

/// Default quotation service type.
pub const DEFAULT_SERVICE_TYPE: &str = SERVICE_TYPES[0];

/// Default quotation period.
pub const DEFAULT_PERIOD: &str = "12 Months";

/// Default quotation payment term.
pub const DEFAULT_PAYMENT_TERM: &str = "Net 30";
