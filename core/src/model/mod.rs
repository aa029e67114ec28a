pub mod coordinate;
pub mod fire;
pub mod location;
pub mod marker;

pub use coordinate::Coordinate;
pub use fire::Fire;
pub use location::{Credentials, LocationUpdate, NewLocation, UserLocation};
pub use marker::{Marker, MarkerKind, PublicSearch, SelectedMarker, SelectionKind, Viewport};
