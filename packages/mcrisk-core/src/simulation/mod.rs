//! Monte Carlo simulation stages.
//!
//! Return generation draws a `days × simulations` matrix of daily returns;
//! compounding turns it into portfolio values along each path.

mod compound;
mod returns;

pub use compound::compound;
pub use returns::{
    generate_returns, generate_returns_partitioned, generate_returns_with, ReturnSource,
    TRADING_DAYS_PER_YEAR,
};
