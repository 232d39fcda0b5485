//! City dataset for miqat.
//!
//! ```
//! let place = miqat_places::find_place(21.42, 39.83);
//! assert_eq!(place.city, "Mecca");
//! ```

mod index;
mod place;

pub use index::{find_place, get_place, PlaceIndex};
pub use place::{CountryData, Place};
