pub mod disk;
pub mod request;
pub mod storage_domain;
pub mod vm;

pub use disk::{Disk, DiskImage, DiskVmElement, ImageVolume};
pub use request::RelocationRequest;
pub use storage_domain::StorageDomain;
pub use vm::{Snapshot, Vm, VmDevice, VmTemplate};
