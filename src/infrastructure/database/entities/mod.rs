//! Database entities module

pub mod customer;
pub mod driver;
pub mod invoice;
pub mod notification;
pub mod order;
pub mod order_item;
pub mod schedule;
pub mod schedule_leg;
pub mod schedule_stop;
pub mod stop;
pub mod subscription_order;
pub mod trip;
pub mod trip_point;
pub mod trip_seat;
pub mod vehicle;
pub mod vehicle_seat;
pub mod voucher;

pub use customer::Entity as Customer;
pub use driver::Entity as Driver;
pub use invoice::Entity as Invoice;
pub use notification::Entity as Notification;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;
pub use schedule::Entity as Schedule;
pub use schedule_leg::Entity as ScheduleLeg;
pub use schedule_stop::Entity as ScheduleStop;
pub use stop::Entity as Stop;
pub use subscription_order::Entity as SubscriptionOrder;
pub use trip::Entity as Trip;
pub use trip_point::Entity as TripPoint;
pub use trip_seat::Entity as TripSeat;
pub use vehicle::Entity as Vehicle;
pub use vehicle_seat::Entity as VehicleSeat;
pub use voucher::Entity as Voucher;
