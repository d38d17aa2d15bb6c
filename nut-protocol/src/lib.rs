//! Protocol codec for the NUT network protocol
//!
//! This crate encodes commands and decodes simple (`OK`/`ERR`) and list
//! (`BEGIN LIST` ... `END LIST`) replies. It holds no connection state: every
//! function takes the [`StreamAccessor`](nut_transport::StreamAccessor) to
//! talk to.

pub mod codec;
pub mod list;
pub mod reply;
pub mod requests;

pub use codec::{read_list, read_simple, request_list, request_simple, send, DEFAULT_MAX_LIST_BYTES};
pub use list::{parse_commands, parse_ups, parse_vars, ListKind};
pub use reply::{classify_err, decode_line, unquote, ACCESS_DENIED};
pub use requests::ListLimits;
