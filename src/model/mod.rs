pub mod block;
pub mod event;
pub mod record;
pub mod snapshot;

pub use block::{Block, BlockTag};
pub use event::{EventKind, VaultEvent};
pub use record::{NewYield, YieldRecord};
pub use snapshot::{PriceAccessor, VaultSnapshot};
