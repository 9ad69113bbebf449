pub mod models;
pub mod pii;

pub use models::{
    AvailabilitySnapshot, Category, CategorySummary, ContentItem, Country, CountrySummary,
    NewReservation, NewSubscriber, Page, Paginated, PaginationMeta, PartySizeInput, Reservation,
    ReservationFilter, ReservationRequest, ReservationStatus, SubscribeRequest, Subscriber,
};
pub use pii::Masked;
