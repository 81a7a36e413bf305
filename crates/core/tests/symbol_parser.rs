use ft9xx_core::toolchain::{parse_symbol_table, Symbol};

const OBJDUMP_OUTPUT: &str = "
blinky.elf:     file format elf32-ft32

SYMBOL TABLE:
00000000 l    d  .text\t00000000 .text
00800000 l    d  .data\t00000000 .data
00000200 g     F .text\t00000040 main
00000100 g     F .text\t00000020 .hidden helper
00000180 l     F .text\t00000040 static_fn
00800010 g     O .bss\t00000100 buffer
00800004 g     O .data\t00000004 counter
";

#[test]
fn groups_by_section_and_sorts_by_address() {
    let table = parse_symbol_table("blinky.elf", OBJDUMP_OUTPUT);
    assert_eq!(table.binary_file, "blinky.elf");
    assert_eq!(table.sections.keys().collect::<Vec<_>>(), vec![".bss", ".data", ".text"]);

    let text: Vec<&str> = table.section(".text").unwrap().iter().map(|s| s.address.as_str()).collect();
    assert_eq!(text, vec!["00000000", "00000100", "00000180", "00000200"]);

    let data: Vec<&str> = table.section(".data").unwrap().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(data, vec![".data", "counter"]);
    assert_eq!(table.symbol_count(), 7);
}

#[test]
fn captures_flags_size_and_hidden_marker() {
    let table = parse_symbol_table("blinky.elf", OBJDUMP_OUTPUT);
    let text = table.section(".text").unwrap();

    let helper = text.iter().find(|s| s.name == "helper").expect("helper");
    assert!(helper.hidden);
    assert_eq!(helper.flag, Some('g'));
    assert_eq!(helper.symbol_type, Some('F'));
    assert_eq!(helper.size, 0x20);
    assert_eq!(helper.address_value(), 0x100);

    let section_sym = &text[0];
    assert_eq!(section_sym.name, ".text");
    assert_eq!(section_sym.flag, Some('l'));
    assert_eq!(section_sym.symbol_type, Some('d'));
    assert!(!section_sym.hidden);
}

#[test]
fn hidden_marker_only_sets_the_hidden_flag() {
    let plain = parse_symbol_table("a.elf", "00000100 g     F .text\t00000020 helper\n");
    let hidden = parse_symbol_table("a.elf", "00000100 g     F .text\t00000020 .hidden helper\n");

    let plain = &plain.section(".text").expect("plain .text")[0];
    let hidden = &hidden.section(".text").expect("hidden .text")[0];
    assert!(!plain.hidden);
    assert!(hidden.hidden);
    assert_eq!(Symbol { hidden: false, ..hidden.clone() }, *plain);
}

#[test]
fn unsorted_input_is_ordered_by_address() {
    let output = "\
00000200 g     F .text\t00000004 c
00000100 g     F .text\t00000004 a
00000180 g     F .text\t00000004 b
";
    let table = parse_symbol_table("x.elf", output);
    let names: Vec<&str> = table.section(".text").unwrap().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn noise_lines_are_skipped() {
    let output = "garbage\n\nSYMBOL TABLE:\nno symbols\n";
    let table = parse_symbol_table("x.elf", output);
    assert!(table.sections.is_empty());
    assert_eq!(table.symbol_count(), 0);
}

#[test]
fn overlong_address_is_skipped_not_fatal() {
    let output = "\
1ffffffffffffffff g     F .text\t00000004 too_big
00000010 g     F .text\t00000004 ok
";
    let table = parse_symbol_table("x.elf", output);
    let names: Vec<&str> = table.section(".text").unwrap().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["ok"]);
}

#[test]
fn largest_orders_by_size_and_keeps_ties_stable() {
    let table = parse_symbol_table("blinky.elf", OBJDUMP_OUTPUT);
    let top: Vec<&str> = table.largest(3).iter().map(|s| s.name.as_str()).collect();
    // buffer (0x100), then main and static_fn tie at 0x40 in address order.
    assert_eq!(top, vec!["buffer", "static_fn", "main"]);
    assert_eq!(table.largest(100).len(), table.symbol_count());
}

#[test]
fn symbol_serializes_type_field_name() {
    let table = parse_symbol_table("x.elf", "00000010 g     F .text\t00000004 ok\n");
    let json = serde_json::to_value(&table.section(".text").unwrap()[0]).unwrap();
    assert_eq!(json["type"], "F");
    assert_eq!(json["flag"], "g");
    assert_eq!(json["size"], 4);
}
