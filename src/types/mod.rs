pub mod donation;

pub use donation::{Donation, NewDonation, PENDING, PendingDonation};
