use contracts::dashboards::d400_profit_summary::{DateRange, PeriodSummaryDto};
use contracts::projections::p901_profit_lines::ProfitLineDto;

use crate::shared::format::{format_excel_amount, format_excel_quantity};

/// UTF-8 BOM so Excel picks the right encoding for Turkish letters
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Данные, которые можно выгрузить в Excel (CSV с разделителем `;`)
pub trait ExcelExportable {
    fn headers(invoice_rate: f64) -> Vec<String>;
    fn to_csv_row(&self) -> Vec<String>;
}

fn invoice_column(invoice_rate: f64) -> String {
    format!("Fatura %{}", (invoice_rate * 100.0).round() as i64)
}

impl ExcelExportable for ProfitLineDto {
    fn headers(invoice_rate: f64) -> Vec<String> {
        vec![
            "Sipariş".into(),
            "Ürün".into(),
            "Barkod/SKU".into(),
            "Kampanya".into(),
            "Adet".into(),
            "Satış".into(),
            "Komisyon".into(),
            "Kargo".into(),
            "Satıcı İndirim".into(),
            "Trendyol İndirim".into(),
            invoice_column(invoice_rate),
            "Toplam Kesinti".into(),
            "Net Kâr".into(),
            "Birim Maliyet".into(),
            "Gerçek Net Kâr".into(),
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.order_number.clone(),
            self.product_name.clone(),
            self.sku.clone(),
            self.campaign.clone(),
            format_excel_quantity(self.quantity),
            format_excel_amount(self.sale),
            format_excel_amount(self.commission),
            format_excel_amount(self.cargo),
            format_excel_amount(self.seller_discount),
            format_excel_amount(self.marketplace_discount),
            format_excel_amount(self.invoice_tax),
            format_excel_amount(self.total_deductions),
            format_excel_amount(self.net_profit),
            self.unit_cost.map(format_excel_amount).unwrap_or_default(),
            self.true_net_profit.map(format_excel_amount).unwrap_or_default(),
        ]
    }
}

fn summary_rows(period: &DateRange, invoice_rate: f64, s: &PeriodSummaryDto) -> Vec<[String; 2]> {
    let mut rows = vec![
        ["Başlangıç".to_string(), period.start.clone()],
        ["Bitiş".to_string(), period.end.clone()],
        ["Sipariş".to_string(), s.order_count.to_string()],
        ["Satış".to_string(), format_excel_amount(s.sale_total)],
        ["Komisyon".to_string(), format_excel_amount(s.commission_total)],
        ["Kargo".to_string(), format_excel_amount(s.cargo_total)],
        ["Satıcı İndirim".to_string(), format_excel_amount(s.seller_discount_total)],
        ["Trendyol İndirim".to_string(), format_excel_amount(s.marketplace_discount_total)],
        [invoice_column(invoice_rate), format_excel_amount(s.invoice_tax_total)],
        ["Toplam Kesinti".to_string(), format_excel_amount(s.total_deductions_total)],
        ["Net Kâr".to_string(), format_excel_amount(s.net_profit_total)],
    ];
    if s.costed_line_count > 0 {
        rows.push(["Ürün Maliyeti".to_string(), format_excel_amount(s.product_cost_total)]);
        rows.push(["Gerçek Net Kâr".to_string(), format_excel_amount(s.true_net_profit_total)]);
    }
    rows
}

fn excel_writer(buffer: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(buffer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, csv::Error> {
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Spreadsheet body: summary block ("Alan;Tutar"), an empty line, then the
/// detail table. An empty period gets a single notice instead of the table.
pub fn build_report_csv(
    period: &DateRange,
    invoice_rate: f64,
    summary: &PeriodSummaryDto,
    rows: &[ProfitLineDto],
) -> Result<Vec<u8>, csv::Error> {
    let mut writer = excel_writer(UTF8_BOM.to_vec());
    writer.write_record(["Alan", "Tutar"])?;
    for row in summary_rows(period, invoice_rate, summary) {
        writer.write_record(&row)?;
    }

    // a blank record would be written as `""`, so the separator goes in raw
    let mut buffer = finish(writer)?;
    buffer.extend_from_slice(b"\r\n");

    let mut writer = excel_writer(buffer);
    if rows.is_empty() {
        writer.write_record(["Bu tarih aralığında veri bulunamadı."])?;
    } else {
        writer.write_record(ProfitLineDto::headers(invoice_rate))?;
        for row in rows {
            writer.write_record(row.to_csv_row())?;
        }
    }
    finish(writer)
}

pub fn report_file_name(period: &DateRange) -> String {
    format!("trendyol_kar_zarar_{}_to_{}.csv", period.start, period.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> DateRange {
        DateRange {
            start: "2024-06-01".into(),
            end: "2024-06-07".into(),
        }
    }

    fn row() -> ProfitLineDto {
        ProfitLineDto {
            order_number: "10001".into(),
            product_name: "Kupa; büyük".into(),
            sku: "869".into(),
            campaign: String::new(),
            quantity: 1.0,
            sale: 300.0,
            commission: 30.0,
            cargo: 29.9,
            seller_discount: 20.0,
            marketplace_discount: 0.0,
            invoice_tax: 28.0,
            total_deductions: 107.9,
            net_profit: 192.1,
            unit_cost: None,
            product_cost: None,
            true_net_profit: None,
        }
    }

    fn as_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_layout_summary_then_detail() {
        let summary = PeriodSummaryDto {
            order_count: 1,
            net_profit_total: 192.1,
            ..PeriodSummaryDto::default()
        };
        let bytes = build_report_csv(&period(), 0.10, &summary, &[row()]).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = as_text(bytes[UTF8_BOM.len()..].to_vec());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Alan;Tutar");
        assert_eq!(lines[1], "Başlangıç;2024-06-01");
        assert_eq!(lines[3], "Sipariş;1");
        assert!(lines.contains(&"Fatura %10;0,00"));
        assert!(lines.contains(&"Net Kâr;192,10"));
        assert!(!text.contains("Gerçek Net Kâr;"));

        let header_idx = lines
            .iter()
            .position(|l| l.starts_with("Sipariş;Ürün"))
            .unwrap();
        assert_eq!(lines[header_idx - 1], "");
        assert_eq!(
            lines[header_idx + 1],
            "10001;\"Kupa; büyük\";869;;1;300,00;30,00;29,90;20,00;0,00;28,00;107,90;192,10;;"
        );
    }

    #[test]
    fn test_empty_period_notice() {
        let bytes =
            build_report_csv(&period(), 0.18, &PeriodSummaryDto::default(), &[]).unwrap();
        let text = as_text(bytes);
        assert!(text.contains("Fatura %18;0,00"));
        assert!(text.trim_end().ends_with("Bu tarih aralığında veri bulunamadı."));
    }

    #[test]
    fn test_blocks_separated_by_one_crlf_line() {
        let bytes =
            build_report_csv(&period(), 0.10, &PeriodSummaryDto::default(), &[]).unwrap();
        let text = as_text(bytes[UTF8_BOM.len()..].to_vec());

        assert!(text.contains("Net Kâr;0,00\r\n\r\nBu tarih aralığında veri bulunamadı.\r\n"));
        assert!(!text.contains("\"\""));
        assert_eq!(text.matches("\r\n\r\n").count(), 1);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            report_file_name(&period()),
            "trendyol_kar_zarar_2024-06-01_to_2024-06-07.csv"
        );
    }
}
