pub mod kyc_repo;

pub use kyc_repo::KycRepository;
