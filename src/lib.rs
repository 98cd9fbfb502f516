pub mod clock;
pub mod collections;
pub mod json;
pub mod logging;
pub mod random;
pub mod stats;
pub mod strings;
pub mod tabular;
pub mod utils;
pub mod version;

pub use clock::{Clock, SystemClock};
pub use logging::init_logger;
pub use random::MapWeights;
pub use stats::{MsgContext, SenderStats, ServStats};
pub use utils::{LoggingConfig, Result, StatsConfig, UtilError, UtilsConfig};
pub use version::{Version, VERSION};
