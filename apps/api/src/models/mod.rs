// Domain values shared by the parser, the hydrator and the HTTP host.

pub mod filter;
pub mod resume;
