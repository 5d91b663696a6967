//! Only structs can be host objects.

use fnspec::HostObject;

#[derive(Debug, HostObject)]
#[allow(dead_code)]
enum Shape {
    Circle,
}

fn main() {}
