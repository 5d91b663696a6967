//! Fields can only be exposed for reading.

use fnspec::HostObject;

#[derive(Debug, HostObject)]
#[allow(dead_code)]
struct Test {
    #[fnspec(set)]
    x: i32,
}

fn main() {}
