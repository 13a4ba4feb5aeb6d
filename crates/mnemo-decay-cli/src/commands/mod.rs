pub mod assess;
pub mod migrate;
pub mod policy;
pub mod reinforce;

pub use assess::AssessCommand;
pub use migrate::MigrateCommand;
pub use policy::PolicyCommand;
pub use reinforce::ReinforceCommand;
