pub mod dispatcher;

pub use dispatcher::ServiceNotificationDispatcher;
