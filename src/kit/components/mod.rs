// Focus-sensitive widgets for OrbitKit

pub mod button;
pub mod checkbox;
pub mod dropdown;
pub mod edit;
pub mod slider;
