pub mod cloud_stub;
