pub mod availability;
pub mod content;
pub mod lenient;
pub mod pagination;
pub mod reservation;
pub mod subscriber;

pub use availability::AvailabilitySnapshot;
pub use content::{Category, CategorySummary, ContentItem, Country, CountrySummary};
pub use pagination::{Page, Paginated, PaginationMeta};
pub use reservation::{
    NewReservation, PartySizeInput, Reservation, ReservationFilter, ReservationRequest,
    ReservationStatus,
};
pub use subscriber::{NewSubscriber, SubscribeRequest, Subscriber};
