//! Application layer: the availability service, the overdue sweep, and the
//! loop that schedules it.

pub mod overdue;
pub mod scheduler;
pub mod service;

pub use overdue::OverdueLockHandling;
pub use scheduler::run_overdue_sweeps;
pub use service::AvailabilityService;
