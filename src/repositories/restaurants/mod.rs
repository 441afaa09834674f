pub mod restaurant_repo;

pub use restaurant_repo::RestaurantRepository;
