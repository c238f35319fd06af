//! Repository implementations for all TableBook entities.

pub mod menu;
pub mod order;
pub mod reservation;
pub mod restaurant;
pub mod time_slot;

pub use menu::MenuRepository;
pub use order::OrderRepository;
pub use reservation::ReservationRepository;
pub use restaurant::RestaurantRepository;
pub use time_slot::TimeSlotRepository;
