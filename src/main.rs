use xfast_rs::{XFastMap, XFastSet};

fn main() -> xfast_rs::Result<()> {
    let mut set = XFastSet::with_key_bits(8)?;

    // Insert
    set.insert(0)?;
    set.insert(1)?;
    set.insert(5)?;
    println!("Set: {set:?}"); // {0, 1, 5}

    // Extremes
    println!("Leftmost: {:?}", set.leftmost()); // Some(0)
    println!("Rightmost: {:?}", set.rightmost()); // Some(5)

    // Neighbours, whether or not the query is a member
    println!("Predecessor of 5: {:?}", set.predecessor(5)?); // Some(1)
    println!("Successor of 2: {:?}", set.successor(2)?); // Some(5)
    println!("Successor of 5: {:?}", set.successor(5)?); // None

    // Remove
    let removed = set.remove(1)?;
    println!("Removed 1: {removed}"); // true
    println!("Contains 1: {}", set.contains(1)); // false

    // Keys wider than the configured width are rejected
    if let Err(err) = set.insert(300) {
        println!("Insert 300: {err}");
    }

    let mut hits: XFastMap<u64> = XFastMap::with_key_bits(32)?;
    hits.insert(10, 500)?;
    hits.insert(20, 600)?;
    hits.insert(40, 800)?;

    // Count a hit, creating the entry if needed
    *hits.get_or_insert_with(30, || 0)? += 1;

    if let Some((key, count)) = hits.floor(35)? {
        println!("Floor of 35: {key} -> {count}"); // 30 -> 1
    }
    for count in hits.values_mut() {
        *count *= 2;
    }
    for (key, count) in hits.iter().rev() {
        println!("{key}: {count}");
    }
    Ok(())
}
