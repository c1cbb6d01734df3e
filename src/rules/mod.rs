//! Static domain rule tables (C1): NAICS benchmarks and matching, the
//! set-aside eligibility lattice, state adjacency, TAA country lists, and
//! Section 889 prohibited entities. Everything here is process-wide,
//! immutable after first access, and has no I/O.

pub mod geography;
pub mod labor;
pub mod naics;
pub mod section_889;
pub mod set_aside;
pub mod taa;
