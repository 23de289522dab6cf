use serde_json::Value;

/// A spreadsheet cell. JSON scalars are carried through untouched; `Null` renders blank.
pub type Cell = Value;

/// Which nested collection a category's records carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    /// Credit/debit notes: `nt[] -> items[]`.
    Note,
    /// Everything else: `inv[] -> items[]`.
    Invoice,
}

impl RecordShape {
    pub fn for_category(category: &str) -> Self {
        match category {
            "cdnr" | "cdnra" => Self::Note,
            _ => Self::Invoice,
        }
    }

    /// Key of the record-level list holding notes or invoices.
    pub fn list_key(&self) -> &'static str {
        match self {
            Self::Note => "nt",
            Self::Invoice => "inv",
        }
    }
}

/// Supplier fields shared by every row flattened out of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierHeader {
    pub trade_name: Cell,
    pub ctin: Cell,
    pub supplier_period: Cell,
    pub supplier_filing_date: Cell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxAmounts {
    pub taxable_value: Cell,
    pub sgst: Cell,
    pub cgst: Cell,
    pub igst: Cell,
    pub cess: Cell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteLine {
    pub number: Cell,
    pub date: Cell,
    pub original_number: Cell,
    pub original_date: Cell,
    pub note_type: Cell,
    pub reverse_charge: Cell,
    pub itc_available: Cell,
    pub reason: Cell,
    pub pos: Cell,
    pub value: Cell,
    pub amounts: TaxAmounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    pub number: Cell,
    pub date: Cell,
    pub invoice_type: Cell,
    pub reverse_charge: Cell,
    pub itc_available: Cell,
    pub reason: Cell,
    pub pos: Cell,
    pub source_type: Cell,
    pub irn: Cell,
    pub irn_generated: Cell,
    pub value: Cell,
    pub amounts: TaxAmounts,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineDetail {
    Note(NoteLine),
    Invoice(InvoiceLine),
}

/// One flattened (record, note-or-invoice, item) combination.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub category: String,
    pub month: String,
    pub header: SupplierHeader,
    pub detail: LineDetail,
}

pub const CATEGORY_COLUMN: &str = "Category";

impl Row {
    pub fn shape(&self) -> RecordShape {
        match self.detail {
            LineDetail::Note(_) => RecordShape::Note,
            LineDetail::Invoice(_) => RecordShape::Invoice,
        }
    }

    pub fn amounts(&self) -> &TaxAmounts {
        match &self.detail {
            LineDetail::Note(note) => &note.amounts,
            LineDetail::Invoice(inv) => &inv.amounts,
        }
    }

    /// Named cells in sheet column order, `Category` first.
    pub fn fields(&self) -> Vec<(&'static str, Cell)> {
        let mut fields = vec![
            (CATEGORY_COLUMN, Cell::from(self.category.as_str())),
            ("Month", Cell::from(self.month.as_str())),
            ("Trade Name", self.header.trade_name.clone()),
            ("CTIN", self.header.ctin.clone()),
            ("Supplier Period", self.header.supplier_period.clone()),
            ("Supplier Filing Date", self.header.supplier_filing_date.clone()),
        ];
        match &self.detail {
            LineDetail::Note(note) => fields.extend([
                ("Invoice Number", note.number.clone()),
                ("Invoice Date", note.date.clone()),
                ("Original Invoice Number", note.original_number.clone()),
                ("Original Invoice Date", note.original_date.clone()),
                ("Invoice Type", note.note_type.clone()),
                ("Reverse Charge", note.reverse_charge.clone()),
                ("ITC Available", note.itc_available.clone()),
                ("Reason", note.reason.clone()),
                ("POS", note.pos.clone()),
                ("Invoice Value", note.value.clone()),
            ]),
            LineDetail::Invoice(inv) => fields.extend([
                ("Invoice Number", inv.number.clone()),
                ("Invoice Date", inv.date.clone()),
                ("Invoice Type", inv.invoice_type.clone()),
                ("Reverse Charge", inv.reverse_charge.clone()),
                ("ITC Available", inv.itc_available.clone()),
                ("Reason", inv.reason.clone()),
                ("POS", inv.pos.clone()),
                ("Source Type", inv.source_type.clone()),
                ("IRN", inv.irn.clone()),
                ("IRN Generation Date", inv.irn_generated.clone()),
                ("Invoice Value", inv.value.clone()),
            ]),
        }
        let amounts = self.amounts();
        fields.extend([
            ("Taxable Value", amounts.taxable_value.clone()),
            ("SGST", amounts.sgst.clone()),
            ("CGST", amounts.cgst.clone()),
            ("IGST", amounts.igst.clone()),
            ("CESS", amounts.cess.clone()),
        ]);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts() -> TaxAmounts {
        TaxAmounts {
            taxable_value: Cell::from(100),
            sgst: Cell::from(9),
            cgst: Cell::from(9),
            igst: Cell::from(0),
            cess: Cell::from(0),
        }
    }

    fn header() -> SupplierHeader {
        SupplierHeader {
            trade_name: Cell::from("ACME"),
            ctin: Cell::from("27AAAAA0000A1Z5"),
            supplier_period: Cell::from("032024"),
            supplier_filing_date: Cell::from("11-04-2024"),
        }
    }

    #[test]
    fn test_shape_for_category() {
        assert_eq!(RecordShape::for_category("cdnr"), RecordShape::Note);
        assert_eq!(RecordShape::for_category("cdnra"), RecordShape::Note);
        assert_eq!(RecordShape::for_category("b2b"), RecordShape::Invoice);
        assert_eq!(RecordShape::for_category("CDNR"), RecordShape::Invoice);
        assert_eq!(RecordShape::Note.list_key(), "nt");
        assert_eq!(RecordShape::Invoice.list_key(), "inv");
    }

    #[test]
    fn test_note_row_column_order() {
        let row = Row {
            category: "cdnr".into(),
            month: "20-2403".into(),
            header: header(),
            detail: LineDetail::Note(NoteLine {
                number: Cell::from("CN-1"),
                date: Cell::Null,
                original_number: Cell::Null,
                original_date: Cell::Null,
                note_type: Cell::from("C"),
                reverse_charge: Cell::from("N"),
                itc_available: Cell::from("Y"),
                reason: Cell::Null,
                pos: Cell::from("27"),
                value: Cell::from(118),
                amounts: amounts(),
            }),
        };
        let names: Vec<&str> = row.fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), 21);
        assert_eq!(&names[..3], &["Category", "Month", "Trade Name"]);
        assert_eq!(names[8], "Original Invoice Number");
        assert_eq!(names.last(), Some(&"CESS"));
        assert!(!names.contains(&"IRN"));
        assert_eq!(row.shape(), RecordShape::Note);
    }

    #[test]
    fn test_invoice_row_column_order() {
        let row = Row {
            category: "b2b".into(),
            month: "Unknown".into(),
            header: header(),
            detail: LineDetail::Invoice(InvoiceLine {
                number: Cell::from("INV-1"),
                date: Cell::from("01-03-2024"),
                invoice_type: Cell::from("R"),
                reverse_charge: Cell::from("N"),
                itc_available: Cell::from("Y"),
                reason: Cell::Null,
                pos: Cell::from("27"),
                source_type: Cell::from(""),
                irn: Cell::from(""),
                irn_generated: Cell::from(""),
                value: Cell::from(118),
                amounts: amounts(),
            }),
        };
        let fields = row.fields();
        assert_eq!(fields.len(), 22);
        assert_eq!(fields[0], ("Category", Cell::from("b2b")));
        assert_eq!(fields[13].0, "Source Type");
        assert_eq!(fields[17], ("Taxable Value", Cell::from(100)));
        assert_eq!(row.shape(), RecordShape::Invoice);
    }
}
