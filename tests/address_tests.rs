//! Column addressing tests

use sheetsync::address::{from_letter, remote_row, to_letter, CellAddress};
use sheetsync::SyncError;

#[test]
fn test_letter_round_trip_up_to_10000() {
    for n in 1..=10_000 {
        let letters = to_letter(n).unwrap();
        assert_eq!(from_letter(&letters).unwrap(), n, "round trip failed for {}", letters);
    }
}

#[test]
fn test_letters_are_bijective_not_naive_base26() {
    // A naive base-26 encoding would produce "BA" or "A@" around these boundaries
    assert_eq!(to_letter(26).unwrap(), "Z");
    assert_eq!(to_letter(52).unwrap(), "AZ");
    assert_eq!(to_letter(53).unwrap(), "BA");
    assert_eq!(to_letter(676).unwrap(), "YZ");
    assert_eq!(to_letter(16384).unwrap(), "XFD");
}

#[test]
fn test_from_letter_rejects_garbage() {
    for bad in ["", " ", "A-B", "1", "Ä"] {
        assert!(
            matches!(from_letter(bad), Err(SyncError::InvalidAddress(_))),
            "'{}' should be rejected",
            bad
        );
    }
}

#[test]
fn test_cell_address_for_field() {
    // Header field at position 1 ("age"), first data row
    let address = CellAddress::for_field("Members", 1, 1);
    assert_eq!(address.row, remote_row(1));
    assert_eq!(address.to_a1().unwrap(), "Members!B2");
    assert_eq!(address.to_string(), "Members!B2");
}

#[test]
fn test_cell_address_zero_column_is_invalid() {
    let address = CellAddress::new("Members", 0, 2);
    assert!(matches!(address.to_a1(), Err(SyncError::InvalidAddress(_))));
}
