use super::*;
use crate::error::Error;

#[test]
fn letter_set_size_and_membership() {
    let set = LetterSet::of("").unwrap();
    assert_eq!(set.len(), 0);
    assert!(!set.contains('a'));
    assert!(!set.contains(' '));

    let set = LetterSet::of("09AZaz").unwrap();
    assert_eq!(set.len(), 6);
    for c in "09AZaz".chars() {
        assert!(set.contains(c));
    }
    for c in "2345678qwertyuiopsdfghjklxcvbnmQWERTYUIOPSDFGHJKLXCVBNM".chars() {
        assert!(!set.contains(c), "{} should not be a member", c);
    }

    let set = LetterSet::single('D').unwrap();
    assert_eq!(set.len(), 1);
    assert!(set.contains('D'));
    assert!(!set.contains('d'));
    assert!(!set.contains('='));

    /* Duplicates collapse */
    assert_eq!(LetterSet::of("JAVA").unwrap().len(), 3);
}

#[test]
fn letter_set_rejects_foreign_chars() {
    assert_eq!(LetterSet::of("AB-"), Err(Error::OutOfAlphabet('-')));
    assert_eq!(LetterSet::single('ж'), Err(Error::OutOfAlphabet('ж')));
    /* Silent for lookups */
    assert!(!LetterSet::of("AB").unwrap().contains('ж'));
}

#[test]
fn letter_set_intersects() {
    let empty = LetterSet::EMPTY;
    assert!(!empty.intersects(&empty));
    assert!(!empty.intersects(&LetterSet::single('A').unwrap()));
    assert!(LetterSet::single('A').unwrap().intersects(&LetterSet::single('A').unwrap()));

    let digits = LetterSet::of("1590").unwrap();
    assert!(!digits.intersects(&LetterSet::of("2487").unwrap()));
    assert!(digits.intersects(&LetterSet::of("9847").unwrap()));

    let upper = LetterSet::of("QWERTYUIOPASDFGHJKLZXCVBNM").unwrap();
    let lower = LetterSet::of("qwertyuiopasdfghjklzxcvbnm").unwrap();
    assert_eq!(upper.len(), 26);
    assert!(!upper.intersects(&lower));
    assert!(upper.intersects(&LetterSet::single('C').unwrap()));
}

#[test]
fn letter_set_iterates_in_alphabet_order() {
    assert_eq!(LetterSet::EMPTY.iter().next(), None);
    let set = LetterSet::of("zA0aZ9").unwrap();
    let chars: String = set.iter().collect();
    assert_eq!(chars, "09azAZ");
    assert_eq!(set.to_string(), "[09azAZ]");
}

#[test]
fn letter_map_put_get_remove() {
    let mut map: LetterMap<&str> = LetterMap::new();
    assert!(map.is_empty());
    map.put('A', "alpha").unwrap().put('b', "beta").unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get('A'), Some(&"alpha"));
    assert_eq!(map.get('a'), None);
    assert_eq!(map.get('='), None);

    map.put('A', "alpha-new").unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get('A'), Some(&"alpha-new"));

    assert_eq!(map.put('=', "eq").err(), Some(Error::OutOfAlphabet('=')));

    map.remove('b').unwrap().remove('=').unwrap();
    assert_eq!(map.len(), 1);
    assert!(!map.contains_key('b'));

    map.put_all(vec![('3', "three"), ('z', "zeta")]).unwrap();
    let keys: Vec<char> = map.iter().map(|(c, _)| c).collect();
    assert_eq!(keys, vec!['3', 'z', 'A']);
}

#[test]
fn letter_map_freeze() {
    let mut map: LetterMap<u32> = LetterMap::new();
    map.put('x', 1).unwrap();
    map.freeze();
    assert!(map.is_frozen());
    assert_eq!(map.put('y', 2).err(), Some(Error::Immutable));
    assert_eq!(map.remove('x').err(), Some(Error::Immutable));
    assert_eq!(map.get('x'), Some(&1));
    assert_eq!(map.len(), 1);
}

#[test]
fn char_map_put_contains() {
    let mut map: CharMap<&str> = CharMap::new();
    assert!(!map.contains_key('A'));
    assert_eq!(map.len(), 0);

    map.put('A', "alpha").unwrap().put('b', "beta").unwrap();
    assert_eq!(map.len(), 2);
    assert!(map.contains_key('A'));
    assert!(map.contains_key('b'));
    assert!(!map.contains_key('Z'));
    assert!(!map.contains_key('='));

    map.put('Z', "dzeta").unwrap();
    assert_eq!(map.len(), 3);
    assert!(map.contains_key('Z'));
    assert!(!map.contains_key('z'));

    /* Any character goes */
    map.put('ж', "zhe").unwrap().put('=', "equals").unwrap();
    assert_eq!(map.get('ж'), Some(&"zhe"));
    assert_eq!(map.get('='), Some(&"equals"));
    assert_eq!(map.len(), 5);
}

#[test]
fn char_map_remove_and_order() {
    let mut map: CharMap<&str> = CharMap::new();
    map.put('A', "alpha").unwrap()
        .put('2', "two").unwrap()
        .put('a', "alpha-small").unwrap()
        .put('q', "query").unwrap();
    assert_eq!(map.len(), 4);

    map.remove('A').unwrap();
    assert_eq!(map.len(), 3);
    assert!(!map.contains_key('A'));

    map.remove('B').unwrap();
    assert_eq!(map.len(), 3);

    map.remove('q').unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get('q'), None);
    assert_eq!(map.get('a'), Some(&"alpha-small"));
    assert_eq!(map.get('2'), Some(&"two"));

    map.put('A', "alpha-new").unwrap();
    map.remove('2').unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get('A'), Some(&"alpha-new"));
    assert_eq!(map.get('2'), None);

    assert_eq!(map.keys(), &['A', 'a']);
    let values: Vec<&str> = map.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec!["alpha-new", "alpha-small"]);

    for c in "134567890 +=-;'qwertyuiopsdfghjklzxcvbnmQWERTYUIOPSDFGHJKLZXCVBNM".chars() {
        assert!(!map.contains_key(c));
    }

    map.remove('A').unwrap().remove('q').unwrap().remove('a').unwrap().remove('1').unwrap();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.iter().count(), 0);
}

#[test]
fn char_map_grows_and_shrinks_through_representations() {
    let mut map: CharMap<usize> = CharMap::new();
    /* Enough entries to force several rehashes, with colliding low bits */
    let keys: Vec<char> = (0..200u32).filter_map(|i| char::from_u32(0x41 + i * 7)).collect();
    for (i, &c) in keys.iter().enumerate() {
        assert_eq!(map.insert(c, i).unwrap(), None);
    }
    assert_eq!(map.len(), keys.len());
    for (i, &c) in keys.iter().enumerate() {
        assert_eq!(map.get(c), Some(&i));
    }
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(map.keys(), sorted.as_slice());

    for (i, &c) in keys.iter().enumerate().skip(1) {
        assert_eq!(map.take(c).unwrap(), Some(i));
    }
    assert_eq!(map.len(), 1);
    assert_eq!(map.keys(), &[keys[0]]);
    assert_eq!(map.take(keys[0]).unwrap(), Some(0));
    assert!(map.is_empty());
}

#[test]
fn char_map_replaces_values() {
    let mut map: CharMap<u32> = CharMap::new();
    assert_eq!(map.insert('x', 1).unwrap(), None);
    assert_eq!(map.insert('x', 2).unwrap(), Some(1));
    map.put('y', 3).unwrap();
    assert_eq!(map.insert('y', 4).unwrap(), Some(3));
    assert_eq!(map.len(), 2);
    assert_eq!(map.get('x'), Some(&2));
}

#[test]
fn char_map_freeze() {
    let mut map: CharMap<u32> = CharMap::new();
    map.freeze();
    assert_eq!(map.put('a', 1).err(), Some(Error::Immutable));
    assert_eq!(map.remove('a').err(), Some(Error::Immutable));

    let mut map: CharMap<u32> = vec![('a', 1), ('b', 2), ('c', 3)].into_iter().collect();
    map.freeze();
    assert_eq!(map.put('d', 4).err(), Some(Error::Immutable));
    assert_eq!(map.remove('a').err(), Some(Error::Immutable));
    assert_eq!(map.len(), 3);
    assert_eq!(map.get('a'), Some(&1));
}

#[test]
fn tables_lookup_pairs() {
    let mut table: LetterTable<u32> = LetterTable::new();
    table.put_pair("PH", 1).unwrap().put('T', 'S', 2).unwrap();
    assert_eq!(table.get('P', 'H'), Some(&1));
    assert_eq!(table.get_pair("TS").unwrap(), Some(&2));
    assert_eq!(table.get('H', 'P'), None);
    assert_eq!(table.get('ж', 'P'), None);
    assert_eq!(table.put_pair("PHF", 3).err(), Some(Error::InvalidKeyLength("PHF".to_string())));
    assert_eq!(table.put_pair("P", 3).err(), Some(Error::InvalidKeyLength("P".to_string())));
    assert_eq!(table.put('-', 'A', 3).err(), Some(Error::OutOfAlphabet('-')));
    table.freeze();
    assert_eq!(table.put_pair("AB", 3).err(), Some(Error::Immutable));

    let mut table: CharTable<&str> = CharTable::new();
    table.put_pair("ЖЖ", "zh").unwrap().put_pair("Ж-", "dash").unwrap();
    assert_eq!(table.get('Ж', 'Ж'), Some(&"zh"));
    assert_eq!(table.get_pair("Ж-").unwrap(), Some(&"dash"));
    assert_eq!(table.get_pair("-Ж").unwrap(), None);
    assert!(table.get_pair("").is_err());
}
