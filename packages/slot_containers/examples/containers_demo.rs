//! Fills maps with the factorials of 0 to 9 and lists with the numbers 0 to 9, once with the
//! default allocator and once with an extensible pool allocator, and prints their contents.
//!
//! Set `RUST_LOG=slot_alloc=debug` (or `trace`) to see the allocator activity.

use slot_alloc::ExtensiblePoolAllocator;
use slot_containers::{List, OrderedMap};
use tracing_subscriber::EnvFilter;

const ENTRY_COUNT: u64 = 10;

fn factorial(n: u64) -> u64 {
    (1..=n).product()
}

fn print_line(label: &str, values: impl IntoIterator<Item = u64>) {
    let values = values
        .into_iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>();

    println!("{label}: {}", values.join(" "));
}

fn main() -> Result<(), slot_containers::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut map_default = OrderedMap::<u64, u64>::new();
    let mut map_custom = OrderedMap::<u64, u64, ExtensiblePoolAllocator<(u64, u64), 5>>::new();
    let mut list_default = List::<u64>::new();
    let mut list_custom = List::<u64, ExtensiblePoolAllocator<u64, 8>>::new();

    for n in 0..ENTRY_COUNT {
        *map_default.get_or_insert_with(n, u64::default)? = factorial(n);
        *map_custom.get_or_insert_with(n, u64::default)? = factorial(n);
        list_default.append(n)?;
        list_custom.append(n)?;
    }

    print_line(
        "Map with default allocator",
        map_default.iter().map(|(_, value)| *value),
    );
    print_line(
        "Map with custom allocator",
        map_custom.iter().map(|(_, value)| *value),
    );
    print_line(
        "Custom list with default allocator",
        std::iter::from_fn(|| list_default.next_value()),
    );
    print_line(
        "Custom list with custom allocator",
        std::iter::from_fn(|| list_custom.next_value()),
    );

    Ok(())
}
