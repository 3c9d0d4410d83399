//! Builds the invoice preview scene: a 794 px A4-proportioned document with
//! gradient brand bars top and bottom, mirrored from the on-screen preview.
//! Static presentation glue; the pagination engine only sees the resulting
//! scene and rasters.

use crate::assets::AssetBundle;
use crate::invoice::{InvoiceData, calc_totals, format_date_dmy, format_inr};
use crate::scene::{
    Band, DividerNode, EdgeInsets, Fill, ImageNode, Node, RowCell, RowNode, Scene, TableColumn,
    TableNode, TextAlign, TextNode,
};
use crate::types::Color;

/// Preview width: A4 at 96 dpi.
pub const PREVIEW_WIDTH_PX: u32 = 794;
/// Preview never renders shorter than one A4 page at 96 dpi.
pub const PREVIEW_MIN_HEIGHT_PX: u32 = 1123;
/// Height of each brand bar.
pub const BRAND_BAR_HEIGHT_PX: u32 = 80;

const BRAND_BLUE: Color = Color {
    r: 37.0 / 255.0,
    g: 99.0 / 255.0,
    b: 235.0 / 255.0,
};
const BRAND_ORANGE: Color = Color {
    r: 249.0 / 255.0,
    g: 115.0 / 255.0,
    b: 22.0 / 255.0,
};
const MUTED_GRAY: Color = Color {
    r: 107.0 / 255.0,
    g: 114.0 / 255.0,
    b: 128.0 / 255.0,
};

/// Conventional asset name of the company logo.
pub const LOGO_ASSET: &str = "logo";

pub fn build_invoice_scene(data: &InvoiceData, assets: &AssetBundle) -> Scene {
    let totals = calc_totals(data);
    let date = format_date_dmy(&data.date_iso);

    let mut scene = Scene::new(PREVIEW_WIDTH_PX);
    scene.min_height = PREVIEW_MIN_HEIGHT_PX;
    // Vertical padding reserves room for the bars; the bars themselves are
    // stamped over the edges when the full scene is painted.
    scene.padding = EdgeInsets::symmetric(96.0, 40.0);
    scene.header = Some(top_brand_bar(data, assets));
    scene.footer = Some(bottom_brand_bar(data));

    let mut body = Vec::new();

    // Status badge on the left, invoice meta on the right.
    let mut status_cell = Vec::new();
    if let Some(status) = data.status {
        if assets.image(status.badge_asset()).is_some() {
            body_status_badge(&mut status_cell, status.badge_asset());
        }
    }
    body.push(RowNode::new(vec![
        RowCell::new(1.0, status_cell),
        RowCell::new(
            1.0,
            vec![
                TextNode::new(data.service_title.as_str(), 24.0)
                    .bold()
                    .color(BRAND_BLUE)
                    .align(TextAlign::Right)
                    .into_node(),
                Node::Spacer(8.0),
                TextNode::new(format!("Invoice Number: {}", data.invoice_number), 13.0)
                    .align(TextAlign::Right)
                    .into_node(),
                TextNode::new(format!("DATE: {}", date), 13.0)
                    .align(TextAlign::Right)
                    .into_node(),
            ],
        ),
    ]));
    body.push(Node::Spacer(40.0));

    // Party panels.
    body.push(RowNode::new(vec![
        RowCell::new(1.0, party_panel("Issued To:", &data.issued_to)),
        RowCell::new(1.0, party_panel("Issued From:", &data.issued_from)),
    ]));
    body.push(Node::Spacer(40.0));

    // Project block.
    body.push(TextNode::new("Project Details", 14.0).bold().into_node());
    body.push(Node::Spacer(6.0));
    body.push(detail_line("Project", &data.project.project));
    body.push(detail_line("Delivery", &data.project.delivery));
    body.push(detail_line(
        "Rate per Site",
        &format_inr(data.project.rate_per_site, false),
    ));
    body.push(detail_line(
        "Total Sites",
        &data.project.total_sites.to_string(),
    ));
    body.push(Node::Spacer(40.0));

    // Line items.
    body.push(items_table(data).into_node());
    body.push(Node::Spacer(24.0));

    // Totals panel, right-aligned.
    body.push(RowNode::new(vec![
        RowCell::new(1.6, Vec::new()),
        RowCell::new(1.0, totals_panel(data, &totals)),
    ]));
    body.push(Node::Spacer(40.0));

    // Payment routing.
    body.push(TextNode::new("Payment Details", 14.0).bold().into_node());
    body.push(Node::Spacer(6.0));
    body.push(detail_line("Bank Name", &data.payment.bank_name));
    body.push(detail_line("Account Name", &data.payment.account_name));
    body.push(detail_line("Account Number", &data.payment.account_number));
    body.push(detail_line("IFSC", &data.payment.ifsc));
    body.push(detail_line("Branch", &data.payment.branch));
    body.push(Node::Spacer(40.0));

    // Terms.
    body.push(
        TextNode::new("Terms & Conditions", 14.0)
            .bold()
            .into_node(),
    );
    body.push(Node::Spacer(6.0));
    body.push(
        TextNode::new(data.terms.as_str(), 12.0)
            .color(MUTED_GRAY)
            .into_node(),
    );

    scene.body = body;
    scene
}

fn top_brand_bar(data: &InvoiceData, assets: &AssetBundle) -> Band {
    let mut left = Vec::new();
    if assets.image(LOGO_ASSET).is_some() {
        left.push(ImageNode::new(LOGO_ASSET, 40.0, 40.0).into_node());
    }
    let mut cells = vec![RowCell::new(1.0, left)];
    cells.push(RowCell::new(
        8.0,
        vec![
            TextNode::new(data.company_name.as_str(), 18.0)
                .bold()
                .color(Color::WHITE)
                .into_node(),
        ],
    ));
    cells.push(RowCell::new(
        4.0,
        vec![
            TextNode::new(data.service_title.as_str(), 18.0)
                .bold()
                .color(Color::WHITE)
                .align(TextAlign::Right)
                .into_node(),
        ],
    ));
    Band::new(
        BRAND_BAR_HEIGHT_PX,
        Fill::HorizontalGradient {
            from: BRAND_BLUE,
            to: BRAND_ORANGE,
        },
    )
    .with_padding_x(40.0)
    .with_children(vec![RowNode::new(cells)])
}

fn bottom_brand_bar(data: &InvoiceData) -> Band {
    Band::new(
        BRAND_BAR_HEIGHT_PX,
        // Mirrored gradient on the bottom bar.
        Fill::HorizontalGradient {
            from: BRAND_ORANGE,
            to: BRAND_BLUE,
        },
    )
    .with_padding_x(40.0)
    .with_children(vec![RowNode::new(vec![
        RowCell::new(
            2.0,
            vec![
                TextNode::new(data.issued_from.address.as_str(), 13.0)
                    .bold()
                    .color(Color::WHITE)
                    .into_node(),
            ],
        ),
        RowCell::new(
            1.0,
            vec![
                TextNode::new(data.company_name.as_str(), 13.0)
                    .bold()
                    .color(Color::WHITE)
                    .align(TextAlign::Right)
                    .into_node(),
            ],
        ),
    ])])
}

fn body_status_badge(cell: &mut Vec<Node>, asset: &str) {
    cell.push(ImageNode::new(asset, 124.0, 93.0).opacity(0.9).into_node());
}

fn party_panel(title: &str, party: &crate::invoice::Party) -> Vec<Node> {
    let mut nodes = vec![
        TextNode::new(title, 14.0).bold().into_node(),
        Node::Spacer(6.0),
        TextNode::new(party.name.as_str(), 13.0).into_node(),
        TextNode::new(party.address.as_str(), 13.0).into_node(),
    ];
    if let Some(gstin) = party.gstin.as_deref().filter(|v| !v.is_empty()) {
        nodes.push(TextNode::new(format!("GSTIN: {}", gstin), 13.0).into_node());
    }
    if let Some(pan) = party.pan.as_deref().filter(|v| !v.is_empty()) {
        nodes.push(TextNode::new(format!("PAN: {}", pan), 13.0).into_node());
    }
    nodes
}

fn detail_line(label: &str, value: &str) -> Node {
    TextNode::new(format!("{}: {}", label, value), 13.0).into_node()
}

fn items_table(data: &InvoiceData) -> TableNode {
    let columns = vec![
        TableColumn::new("Description", 5.0, TextAlign::Left),
        TableColumn::new("Qty", 1.5, TextAlign::Right),
        TableColumn::new("Unit Price", 2.5, TextAlign::Right),
        TableColumn::new("Amount", 2.5, TextAlign::Right),
    ];
    let rows = data
        .items
        .iter()
        .map(|item| {
            vec![
                item.description.clone(),
                format_qty(item.qty),
                format_inr(item.unit_price, false),
                format_inr(item.qty * item.unit_price, false),
            ]
        })
        .collect();
    TableNode::new(columns, rows)
}

fn totals_panel(data: &InvoiceData, totals: &crate::invoice::Totals) -> Vec<Node> {
    let mut nodes = vec![
        totals_line("Gross", &format_inr(totals.gross, false), false),
        totals_line(
            "Less: Advance",
            &format_inr(data.advance, false),
            false,
        ),
        totals_line(
            "Net Subtotal",
            &format_inr(totals.net_subtotal, false),
            false,
        ),
        totals_line(
            &format!("GST ({})", format_percent(data.gst_percent)),
            &format_inr(totals.gst, false),
            false,
        ),
        totals_line(
            &format!("TDS ({})", format_percent(data.tds_percent)),
            &format_inr(totals.tds, false),
            false,
        ),
        Node::Spacer(6.0),
        DividerNode::new(Color::from_rgb8(209, 213, 219), 1.0),
        Node::Spacer(6.0),
    ];
    nodes.push(totals_line(
        "Total Payable",
        &format_inr(totals.total_payable, false),
        true,
    ));
    nodes
}

fn totals_line(label: &str, value: &str, emphasized: bool) -> Node {
    let mut label_node = TextNode::new(label, 13.0);
    let mut value_node = TextNode::new(value, 13.0).align(TextAlign::Right);
    if emphasized {
        label_node = label_node.bold();
        value_node = value_node.bold();
    }
    RowNode::new(vec![
        RowCell::new(1.2, vec![label_node.into_node()]),
        RowCell::new(1.0, vec![value_node.into_node()]),
    ])
}

fn format_qty(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{}", qty as i64)
    } else {
        format!("{}", qty)
    }
}

fn format_percent(percent: f64) -> String {
    if percent.fract() == 0.0 {
        format!("{}%", percent as i64)
    } else {
        format!("{}%", percent)
    }
}
