use uuid::Uuid;

use super::*;
use crate::doc::ElementContent;

// =============================================================
// Helpers
// =============================================================

/// Blank design with `n` text elements in `section` at sort orders `0..n`.
fn design_with_texts(section: SectionId, n: usize) -> (Design, Vec<ElementId>) {
    let mut design = Design::blank();
    let mut ids = Vec::new();
    for i in 0..n {
        let element = Element::new(ElementType::Text, section, i);
        ids.push(element.id);
        design.elements.push(element);
    }
    (design, ids)
}

fn order_of(design: &Design, section: SectionId) -> Vec<ElementId> {
    design.section_elements(section).iter().map(|e| e.id).collect()
}

fn sort_orders(design: &Design, section: SectionId) -> Vec<usize> {
    design.section_elements(section).iter().map(|e| e.sort_order).collect()
}

fn sort_order_of(design: &Design, id: &ElementId) -> usize {
    design.element(id).map_or(usize::MAX, |e| e.sort_order)
}

// =============================================================
// insert_element
// =============================================================

#[test]
fn insert_into_empty_section_appends_at_zero() {
    let design = Design::blank();
    let applied = insert_element(&design, ElementType::Text, SectionId::Identity, InsertPosition::End);
    let id = applied.created.unwrap();
    assert_eq!(applied.design.section_len(SectionId::Identity), 1);
    assert_eq!(sort_order_of(&applied.design, &id), 0);
}

#[test]
fn second_append_takes_next_sort_order() {
    let design = Design::blank();
    let first = insert_element(&design, ElementType::Text, SectionId::Identity, InsertPosition::End);
    let first_id = first.created.unwrap();
    let second = insert_element(&first.design, ElementType::Text, SectionId::Identity, InsertPosition::End);
    let second_id = second.created.unwrap();
    assert_eq!(sort_order_of(&second.design, &first_id), 0);
    assert_eq!(sort_order_of(&second.design, &second_id), 1);
}

#[test]
fn insert_does_not_mutate_input() {
    let design = Design::blank();
    let before = design.clone();
    let _applied = insert_element(&design, ElementType::Image, SectionId::Footer, InsertPosition::End);
    assert_eq!(design, before);
}

#[test]
fn insert_after_shifts_later_siblings() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let applied = insert_element(&design, ElementType::Divider, SectionId::Identity, InsertPosition::After(0));
    let new_id = applied.created.unwrap();
    assert_eq!(order_of(&applied.design, SectionId::Identity), vec![ids[0], new_id, ids[1], ids[2]]);
    assert_eq!(sort_orders(&applied.design, SectionId::Identity), vec![0, 1, 2, 3]);
}

#[test]
fn insert_at_slot_zero_prepends() {
    let (design, ids) = design_with_texts(SectionId::Identity, 2);
    let applied = insert_element(&design, ElementType::Spacer, SectionId::Identity, InsertPosition::At(0));
    let new_id = applied.created.unwrap();
    assert_eq!(order_of(&applied.design, SectionId::Identity), vec![new_id, ids[0], ids[1]]);
}

#[test]
fn insert_leaves_other_sections_alone() {
    let (mut design, _) = design_with_texts(SectionId::Identity, 2);
    let footer = Element::new(ElementType::Text, SectionId::Footer, 0);
    let footer_id = footer.id;
    design.elements.push(footer);
    let applied = insert_element(&design, ElementType::Text, SectionId::Identity, InsertPosition::At(0));
    assert_eq!(sort_order_of(&applied.design, &footer_id), 0);
}

#[test]
fn append_after_gap_does_not_collide() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let design = delete_element(&design, &ids[1]);
    let applied = insert_element(&design, ElementType::Text, SectionId::Identity, InsertPosition::End);
    assert!(applied.design.check_invariants().is_ok());
    assert_eq!(order_of(&applied.design, SectionId::Identity).last(), applied.created.as_ref());
}

#[test]
fn insert_new_element_has_default_content() {
    let applied = insert_element(&Design::blank(), ElementType::Spacer, SectionId::Product, InsertPosition::End);
    let element = applied.design.element(&applied.created.unwrap()).unwrap();
    assert_eq!(element.content, ElementType::Spacer.default_content());
    assert_eq!(element.section_id, SectionId::Product);
}

#[test]
fn insert_into_missing_section_is_noop() {
    let mut design = Design::blank();
    design.sections.retain(|s| s.id != SectionId::Supplier);
    let applied = insert_element(&design, ElementType::Text, SectionId::Supplier, InsertPosition::End);
    assert!(applied.created.is_none());
    assert_eq!(applied.design, design);
}

#[test]
fn insert_after_max_index_appends() {
    let (design, ids) = design_with_texts(SectionId::Identity, 2);
    let applied = insert_element(&design, ElementType::Text, SectionId::Identity, InsertPosition::After(usize::MAX));
    let id = applied.created.unwrap();
    assert_eq!(order_of(&applied.design, SectionId::Identity), vec![ids[0], ids[1], id]);
    assert_eq!(sort_order_of(&applied.design, &id), 2);
    assert!(applied.design.check_invariants().is_ok());
}

#[test]
fn insert_past_end_of_empty_section_lands_at_zero() {
    let design = Design::blank();
    let after = insert_element(&design, ElementType::Text, SectionId::Identity, InsertPosition::After(1000));
    assert_eq!(sort_order_of(&after.design, &after.created.unwrap()), 0);
    let at = insert_element(&design, ElementType::Text, SectionId::Identity, InsertPosition::At(99));
    assert_eq!(sort_order_of(&at.design, &at.created.unwrap()), 0);
}

#[test]
fn insert_at_past_end_appends() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let applied = insert_element(&design, ElementType::Spacer, SectionId::Identity, InsertPosition::At(99));
    let id = applied.created.unwrap();
    assert_eq!(sort_orders(&applied.design, SectionId::Identity), vec![0, 1, 2, 3]);
    assert_eq!(order_of(&applied.design, SectionId::Identity), vec![ids[0], ids[1], ids[2], id]);
}

#[test]
fn insert_from_wire_with_huge_index_appends() {
    let edit: Edit = serde_json::from_value(serde_json::json!({
        "op": "insert-element",
        "elementType": "text",
        "sectionId": "identity",
        "position": { "kind": "after", "value": u64::MAX },
    }))
    .unwrap();
    let applied = edit.apply(&Design::blank());
    assert_eq!(sort_order_of(&applied.design, &applied.created.unwrap()), 0);
}

#[test]
fn insert_next_to_saturated_sort_order_renumbers() {
    let (mut design, ids) = design_with_texts(SectionId::Identity, 2);
    if let Some(e) = design.elements.iter_mut().find(|e| e.id == ids[1]) {
        e.sort_order = usize::MAX;
    }
    let applied = insert_element(&design, ElementType::Text, SectionId::Identity, InsertPosition::End);
    let id = applied.created.unwrap();
    assert_eq!(order_of(&applied.design, SectionId::Identity), vec![ids[0], ids[1], id]);
    assert_eq!(sort_orders(&applied.design, SectionId::Identity), vec![0, 1, 2]);
    assert!(applied.design.check_invariants().is_ok());
}

// =============================================================
// update_element
// =============================================================

#[test]
fn update_replaces_content() {
    let (design, ids) = design_with_texts(SectionId::Identity, 1);
    let mut updated = design.element(&ids[0]).unwrap().clone();
    updated.content = ElementContent::Spacer { height: 10.0 };
    let next = update_element(&design, &updated);
    assert_eq!(next.element(&ids[0]).unwrap().content, ElementContent::Spacer { height: 10.0 });
}

#[test]
fn update_never_changes_identity_or_ordering() {
    let (design, ids) = design_with_texts(SectionId::Identity, 2);
    let mut updated = design.element(&ids[1]).unwrap().clone();
    updated.section_id = SectionId::Footer;
    updated.sort_order = 0;
    let next = update_element(&design, &updated);
    let element = next.element(&ids[1]).unwrap();
    assert_eq!(element.id, ids[1]);
    assert_eq!(element.section_id, SectionId::Identity);
    assert_eq!(element.sort_order, 1);
    assert!(next.check_invariants().is_ok());
}

#[test]
fn update_unknown_element_is_noop() {
    let (design, _) = design_with_texts(SectionId::Identity, 1);
    let stranger = Element::new(ElementType::Text, SectionId::Identity, 0);
    assert_eq!(update_element(&design, &stranger), design);
}

// =============================================================
// delete_element
// =============================================================

#[test]
fn delete_removes_and_keeps_gap() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let next = delete_element(&design, &ids[1]);
    assert!(next.element(&ids[1]).is_none());
    assert_eq!(sort_orders(&next, SectionId::Identity), vec![0, 2]);
}

#[test]
fn delete_unknown_is_noop() {
    let (design, _) = design_with_texts(SectionId::Identity, 2);
    assert_eq!(delete_element(&design, &Uuid::new_v4()), design);
}

// =============================================================
// duplicate_element
// =============================================================

#[test]
fn duplicate_lands_directly_after_source() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let applied = duplicate_element(&design, &ids[0]);
    let copy_id = applied.created.unwrap();
    assert_ne!(copy_id, ids[0]);
    assert_eq!(order_of(&applied.design, SectionId::Identity), vec![ids[0], copy_id, ids[1], ids[2]]);
    assert_eq!(
        applied.design.element(&copy_id).unwrap().content,
        design.element(&ids[0]).unwrap().content
    );
    assert!(applied.design.check_invariants().is_ok());
}

#[test]
fn duplicate_unknown_is_noop() {
    let (design, _) = design_with_texts(SectionId::Identity, 1);
    let applied = duplicate_element(&design, &Uuid::new_v4());
    assert!(applied.created.is_none());
    assert_eq!(applied.design, design);
}

#[test]
fn duplicate_of_saturated_element_renumbers() {
    let (mut design, ids) = design_with_texts(SectionId::Identity, 2);
    if let Some(e) = design.elements.iter_mut().find(|e| e.id == ids[1]) {
        e.sort_order = usize::MAX;
    }
    let applied = duplicate_element(&design, &ids[1]);
    let copy_id = applied.created.unwrap();
    assert_eq!(order_of(&applied.design, SectionId::Identity), vec![ids[0], ids[1], copy_id]);
    assert!(applied.design.check_invariants().is_ok());
}

// =============================================================
// move_element_adjacent
// =============================================================

#[test]
fn move_adjacent_swaps_sort_orders() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let next = move_element_adjacent(&design, &ids[2], Direction::Up);
    assert_eq!(order_of(&next, SectionId::Identity), vec![ids[0], ids[2], ids[1]]);
    let next = move_element_adjacent(&next, &ids[0], Direction::Down);
    assert_eq!(order_of(&next, SectionId::Identity), vec![ids[2], ids[0], ids[1]]);
}

#[test]
fn move_adjacent_is_noop_at_ends() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    assert_eq!(move_element_adjacent(&design, &ids[0], Direction::Up), design);
    assert_eq!(move_element_adjacent(&design, &ids[2], Direction::Down), design);
}

#[test]
fn move_adjacent_swaps_across_gap() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let design = delete_element(&design, &ids[1]);
    let next = move_element_adjacent(&design, &ids[2], Direction::Up);
    assert_eq!(sort_order_of(&next, &ids[2]), 0);
    assert_eq!(sort_order_of(&next, &ids[0]), 2);
}

// =============================================================
// reorder_element
// =============================================================

#[test]
fn reorder_moves_and_renumbers() {
    let (design, ids) = design_with_texts(SectionId::Identity, 4);
    let next = reorder_element(&design, SectionId::Identity, 3, 0);
    assert_eq!(order_of(&next, SectionId::Identity), vec![ids[3], ids[0], ids[1], ids[2]]);
    assert_eq!(sort_orders(&next, SectionId::Identity), vec![0, 1, 2, 3]);
}

#[test]
fn reorder_same_index_leaves_design_unchanged() {
    let (design, ids) = design_with_texts(SectionId::Identity, 4);
    let design = delete_element(&design, &ids[1]);
    for i in 0..3 {
        assert_eq!(reorder_element(&design, SectionId::Identity, i, i), design);
    }
}

#[test]
fn reorder_clamps_indices() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let next = reorder_element(&design, SectionId::Identity, 0, 99);
    assert_eq!(order_of(&next, SectionId::Identity), vec![ids[1], ids[2], ids[0]]);
}

#[test]
fn reorder_empty_section_is_noop() {
    let design = Design::blank();
    assert_eq!(reorder_element(&design, SectionId::Footer, 0, 1), design);
}

#[test]
fn reorder_closes_gaps() {
    let (design, ids) = design_with_texts(SectionId::Identity, 4);
    let design = delete_element(&design, &ids[1]);
    let next = reorder_element(&design, SectionId::Identity, 0, 2);
    assert_eq!(order_of(&next, SectionId::Identity), vec![ids[2], ids[3], ids[0]]);
    assert_eq!(sort_orders(&next, SectionId::Identity), vec![0, 1, 2]);
}

// =============================================================
// move_element_to_section
// =============================================================

#[test]
fn cross_section_move_closes_source_gap() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let next = move_element_to_section(&design, &ids[1], SectionId::Identity, SectionId::Product, 0);
    assert_eq!(order_of(&next, SectionId::Identity), vec![ids[0], ids[2]]);
    assert_eq!(sort_orders(&next, SectionId::Identity), vec![0, 1]);
    assert_eq!(order_of(&next, SectionId::Product), vec![ids[1]]);
    assert_eq!(sort_order_of(&next, &ids[1]), 0);
}

#[test]
fn cross_section_move_makes_room_in_target() {
    let (mut design, ids) = design_with_texts(SectionId::Identity, 1);
    let a = Element::new(ElementType::Text, SectionId::Footer, 0);
    let b = Element::new(ElementType::Text, SectionId::Footer, 1);
    let (a_id, b_id) = (a.id, b.id);
    design.elements.extend([a, b]);

    let next = move_element_to_section(&design, &ids[0], SectionId::Identity, SectionId::Footer, 1);
    assert_eq!(order_of(&next, SectionId::Footer), vec![a_id, ids[0], b_id]);
    assert_eq!(sort_orders(&next, SectionId::Footer), vec![0, 1, 2]);
    assert!(next.check_invariants().is_ok());
}

#[test]
fn cross_section_move_clamps_target_index() {
    let (mut design, ids) = design_with_texts(SectionId::Identity, 1);
    let a = Element::new(ElementType::Text, SectionId::Footer, 0);
    let a_id = a.id;
    design.elements.push(a);
    let next = move_element_to_section(&design, &ids[0], SectionId::Identity, SectionId::Footer, 50);
    assert_eq!(order_of(&next, SectionId::Footer), vec![a_id, ids[0]]);
}

#[test]
fn cross_section_move_keeps_id_and_content() {
    let (design, ids) = design_with_texts(SectionId::Identity, 2);
    let before = design.element(&ids[0]).unwrap().clone();
    let next = move_element_to_section(&design, &ids[0], SectionId::Identity, SectionId::Compliance, 0);
    let after = next.element(&ids[0]).unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.content, before.content);
    assert_eq!(after.section_id, SectionId::Compliance);
}

#[test]
fn cross_section_move_uses_actual_source_when_stale() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let next = move_element_to_section(&design, &ids[0], SectionId::Supplier, SectionId::Footer, 0);
    assert_eq!(order_of(&next, SectionId::Identity), vec![ids[1], ids[2]]);
    assert_eq!(sort_orders(&next, SectionId::Identity), vec![0, 1]);
}

#[test]
fn same_section_move_reorders() {
    let (design, ids) = design_with_texts(SectionId::Identity, 3);
    let next = move_element_to_section(&design, &ids[0], SectionId::Identity, SectionId::Identity, 2);
    assert_eq!(order_of(&next, SectionId::Identity), vec![ids[1], ids[2], ids[0]]);
}

#[test]
fn move_unknown_element_or_section_is_noop() {
    let (mut design, ids) = design_with_texts(SectionId::Identity, 1);
    assert_eq!(
        move_element_to_section(&design, &Uuid::new_v4(), SectionId::Identity, SectionId::Footer, 0),
        design
    );
    design.sections.retain(|s| s.id != SectionId::Footer);
    assert_eq!(move_element_to_section(&design, &ids[0], SectionId::Identity, SectionId::Footer, 0), design);
}

// =============================================================
// Sections
// =============================================================

#[test]
fn reorder_sections_moves_and_renumbers() {
    let design = Design::blank();
    let next = reorder_sections(&design, 6, 0);
    let ids: Vec<SectionId> = next.sorted_sections().iter().map(|s| s.id).collect();
    assert_eq!(ids[0], SectionId::Footer);
    assert_eq!(ids[1], SectionId::Identity);
    let orders: Vec<usize> = next.sorted_sections().iter().map(|s| s.sort_order).collect();
    assert_eq!(orders, (0..7).collect::<Vec<_>>());
}

#[test]
fn reorder_sections_same_index_is_noop() {
    let design = Design::blank();
    assert_eq!(reorder_sections(&design, 2, 2), design);
    assert_eq!(reorder_sections(&design, 50, 60), design);
}

#[test]
fn toggle_collapsed_flips_flag() {
    let design = Design::blank();
    let next = toggle_section_collapsed(&design, SectionId::Product);
    assert!(next.section(SectionId::Product).unwrap().collapsed);
    let next = toggle_section_collapsed(&next, SectionId::Product);
    assert!(!next.section(SectionId::Product).unwrap().collapsed);
}

#[test]
fn hiding_section_keeps_its_elements() {
    let (design, ids) = design_with_texts(SectionId::Identity, 2);
    let next = set_section_visible(&design, SectionId::Identity, false);
    assert!(!next.section(SectionId::Identity).unwrap().visible);
    assert_eq!(order_of(&next, SectionId::Identity), ids);
    assert_eq!(next.sections.len(), design.sections.len());
}

#[test]
fn update_section_style_replaces_style() {
    let style = SectionStyle {
        padding: 4.0,
        border_width: 0.5,
        border_color: "#333333".into(),
        background_color: Some("#EEEEEE".into()),
    };
    let next = update_section_style(&Design::blank(), SectionId::Supplier, &style);
    assert_eq!(next.section(SectionId::Supplier).unwrap().style, style);
}

#[test]
fn update_settings_replaces_settings() {
    let settings = DesignSettings { font_family: "Inter".into(), ..DesignSettings::default() };
    let next = update_settings(&Design::blank(), &settings);
    assert_eq!(next.settings.font_family, "Inter");
}

// =============================================================
// Edit
// =============================================================

#[test]
fn edit_serde_uses_op_tag() {
    let edit = Edit::ReorderElement { section_id: SectionId::Identity, from_index: 2, to_index: 0 };
    let value = serde_json::to_value(&edit).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "op": "reorder-element", "sectionId": "identity", "fromIndex": 2, "toIndex": 0 })
    );
    let back: Edit = serde_json::from_value(value).unwrap();
    assert_eq!(back, edit);
}

#[test]
fn edit_insert_parses_position() {
    let edit: Edit = serde_json::from_value(serde_json::json!({
        "op": "insert-element",
        "elementType": "qr-code",
        "sectionId": "footer",
        "position": { "kind": "end" },
    }))
    .unwrap();
    assert_eq!(
        edit,
        Edit::InsertElement {
            element_type: ElementType::QrCode,
            section_id: SectionId::Footer,
            position: InsertPosition::End,
        }
    );
}

#[test]
fn edit_apply_reports_created_element() {
    let edit = Edit::InsertElement {
        element_type: ElementType::Text,
        section_id: SectionId::Identity,
        position: InsertPosition::End,
    };
    let applied = edit.apply(&Design::blank());
    let id = applied.created.unwrap();
    assert!(applied.design.element(&id).is_some());
}

#[test]
fn only_collapse_skips_history() {
    assert!(!Edit::ToggleSectionCollapsed { section_id: SectionId::Identity }.records_history());
    assert!(Edit::SetSectionVisible { section_id: SectionId::Identity, visible: false }.records_history());
    assert!(Edit::ReorderSections { from_index: 0, to_index: 1 }.records_history());
}

#[test]
fn every_edit_preserves_invariants() {
    let (design, ids) = design_with_texts(SectionId::Identity, 4);
    let edits = [
        Edit::InsertElement {
            element_type: ElementType::Barcode,
            section_id: SectionId::Identity,
            position: InsertPosition::After(1),
        },
        Edit::DeleteElement { element_id: ids[2] },
        Edit::DuplicateElement { element_id: ids[0] },
        Edit::MoveElementAdjacent { element_id: ids[3], direction: Direction::Up },
        Edit::ReorderElement { section_id: SectionId::Identity, from_index: 0, to_index: 3 },
        Edit::MoveElementToSection {
            element_id: ids[1],
            from_section_id: SectionId::Identity,
            to_section_id: SectionId::Footer,
            to_index: 0,
        },
        Edit::InsertElement {
            element_type: ElementType::Text,
            section_id: SectionId::Identity,
            position: InsertPosition::At(0),
        },
        Edit::ReorderSections { from_index: 0, to_index: 4 },
    ];
    let mut current = design;
    for edit in &edits {
        current = edit.apply(&current).design;
        assert!(current.check_invariants().is_ok(), "invariants broken after {edit:?}");
    }
}
