//! # bikeshop-service
//!
//! Business logic for the bike shop. Each service orchestrates repositories
//! and the auth primitives to implement one area of the application.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod ad;
pub mod booking;
pub mod catalog;
pub mod context;
pub mod notification;
pub mod payment;
pub mod quote;
pub mod report;
pub mod setting;
pub mod survey;
pub mod ticket;
pub mod user;

pub use ad::AdService;
pub use booking::{BookingDetail, BookingRequest, BookingService, NewBicycle};
pub use catalog::CatalogService;
pub use context::RequestContext;
pub use notification::Notifier;
pub use payment::{MockPaymentProvider, PaymentProvider};
pub use quote::QuoteService;
pub use report::ReportService;
pub use setting::SettingService;
pub use survey::SurveyService;
pub use ticket::{StatusChange, TicketDetail, TicketService, WalkInRequest};
pub use user::{AdminUserService, RegisterRequest, UserForm, UserService};
