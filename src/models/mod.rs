pub mod audit;
pub mod booking;
pub mod event;
pub mod notification;
pub mod ticket;

// Re-export core models for easy access
pub use audit::AuditEntry;
pub use booking::{Booking, BookingRequest, BookingResponse, TicketType};
pub use event::{EventRecord, EventRequest, EventResponse, EventStatus};
pub use notification::{Notification, NotificationChannel};
pub use ticket::Ticket;
