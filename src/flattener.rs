use serde_json::{Map, Value};

use crate::models::{
    Cell, InvoiceLine, LineDetail, NoteLine, RecordShape, Row, SupplierHeader, TaxAmounts,
};

type Object = Map<String, Value>;

const TAX_KEYS: [&str; 4] = ["sgst", "cgst", "igst", "cess"];

// ---------------------------------------------------------------------------
// Field defaulting
// ---------------------------------------------------------------------------
//
// "Absent" means the key is missing. A key that is present with `null` keeps
// its null and renders as a blank cell.

fn empty_text() -> Cell {
    Cell::from("")
}

fn zero() -> Cell {
    Cell::from(0)
}

/// `map[key]`, or blank when absent.
pub fn field(map: &Object, key: &str) -> Cell {
    map.get(key).cloned().unwrap_or(Cell::Null)
}

/// `map[key]`, or `""` when absent.
pub fn text_field(map: &Object, key: &str) -> Cell {
    map.get(key).cloned().unwrap_or_else(empty_text)
}

/// Note POS: the note's own, then the record's, then `""`.
pub fn note_pos(note: &Object, record: &Object) -> Cell {
    note.get("pos")
        .or_else(|| record.get("pos"))
        .cloned()
        .unwrap_or_else(empty_text)
}

/// Note item tax: the item's own, then `0`.
pub fn note_tax(item: &Object, key: &str) -> Cell {
    item.get(key).cloned().unwrap_or_else(zero)
}

/// Invoice taxable value: the item's own, then the invoice's, then blank.
pub fn invoice_taxable_value(item: &Object, inv: &Object) -> Cell {
    item.get("txval")
        .or_else(|| inv.get("txval"))
        .cloned()
        .unwrap_or(Cell::Null)
}

/// Invoice item tax: the item's own, then the invoice's, then `0`.
pub fn invoice_tax(item: &Object, inv: &Object, key: &str) -> Cell {
    item.get(key)
        .or_else(|| inv.get(key))
        .cloned()
        .unwrap_or_else(zero)
}

// ---------------------------------------------------------------------------
// Nested collections
// ---------------------------------------------------------------------------

/// Objects in the array at `map[key]`. Non-arrays and non-object elements are ignored.
fn objects<'a>(map: &'a Object, key: &str) -> impl Iterator<Item = &'a Object> {
    map.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Visit each item of a note or invoice; a missing or empty `items` list
/// counts as one empty item so the parent still yields a row.
fn for_each_item(parent: &Object, mut visit: impl FnMut(&Object)) {
    let mut seen = false;
    for item in objects(parent, "items") {
        seen = true;
        visit(item);
    }
    if !seen {
        visit(&Object::new());
    }
}

fn supplier_header(record: &Object) -> SupplierHeader {
    SupplierHeader {
        trade_name: text_field(record, "trdnm"),
        ctin: text_field(record, "ctin"),
        supplier_period: text_field(record, "supprd"),
        supplier_filing_date: text_field(record, "supfildt"),
    }
}

// ---------------------------------------------------------------------------
// Shape-specific line builders
// ---------------------------------------------------------------------------

fn note_line(record: &Object, note: &Object, item: &Object) -> NoteLine {
    let [sgst, cgst, igst, cess] = TAX_KEYS.map(|key| note_tax(item, key));
    NoteLine {
        number: field(note, "ntnum"),
        date: field(note, "nt_dt"),
        original_number: field(note, "oinum"),
        original_date: field(note, "oidt"),
        note_type: field(note, "typ"),
        reverse_charge: field(note, "rev"),
        itc_available: field(note, "itcavl"),
        reason: field(note, "rsn"),
        pos: note_pos(note, record),
        value: text_field(note, "val"),
        amounts: TaxAmounts {
            taxable_value: text_field(item, "txval"),
            sgst,
            cgst,
            igst,
            cess,
        },
    }
}

fn invoice_line(inv: &Object, item: &Object) -> InvoiceLine {
    let [sgst, cgst, igst, cess] = TAX_KEYS.map(|key| invoice_tax(item, inv, key));
    InvoiceLine {
        number: field(inv, "inum"),
        date: field(inv, "dt"),
        invoice_type: field(inv, "typ"),
        reverse_charge: field(inv, "rev"),
        itc_available: field(inv, "itcavl"),
        reason: field(inv, "rsn"),
        pos: field(inv, "pos"),
        source_type: text_field(inv, "srctyp"),
        irn: text_field(inv, "irn"),
        irn_generated: text_field(inv, "irngendate"),
        value: field(inv, "val"),
        amounts: TaxAmounts {
            taxable_value: invoice_taxable_value(item, inv),
            sgst,
            cgst,
            igst,
            cess,
        },
    }
}

// ---------------------------------------------------------------------------
// flatten
// ---------------------------------------------------------------------------

/// Flatten one supplier record of `category` into rows, one per
/// (note-or-invoice, item) pair, appending them to `out`.
pub fn flatten_into(category: &str, record: &Object, month: &str, out: &mut Vec<Row>) {
    let header = supplier_header(record);
    let shape = RecordShape::for_category(category);
    for line in objects(record, shape.list_key()) {
        for_each_item(line, |item| {
            let detail = match shape {
                RecordShape::Note => LineDetail::Note(note_line(record, line, item)),
                RecordShape::Invoice => LineDetail::Invoice(invoice_line(line, item)),
            };
            out.push(Row {
                category: category.to_string(),
                month: month.to_string(),
                header: header.clone(),
                detail,
            });
        });
    }
}

pub fn flatten(category: &str, record: &Object, month: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    flatten_into(category, record, month, &mut rows);
    rows
}
