//! Unknown type-level attribute.

use fnspec::HostObject;

#[derive(HostObject)]
#[fnspec(value)]
#[allow(dead_code)]
struct Test {
    x: i32,
}

fn main() {}
