//! Well-known CPACS element paths.

/// Path of the aircraft model element.
pub const AIRCRAFT_XPATH: &str = "/cpacs/vehicles/aircraft/model";

/// Path of the aircraft reference values.
pub const REFERENCE_XPATH: &str = "/cpacs/vehicles/aircraft/model/reference";

/// Path of the wing list.
pub const WINGS_XPATH: &str = "/cpacs/vehicles/aircraft/model/wings";

/// Path of the aeroPerformance analysis element holding the aeromaps.
pub const AEROPERFORMANCE_XPATH: &str = "/cpacs/vehicles/aircraft/model/analyses/aeroPerformance";

/// Path of the aircraft name in the CPACS header.
pub const AIRCRAFT_NAME_XPATH: &str = "/cpacs/header/name";
