// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON instead of a table"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn yes_arg() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Confirm the deletion")
}

fn period_arg() -> Arg {
    Arg::new("period")
        .long("period")
        .help("Year (YYYY) or month (YYYY-MM)")
}

fn year_arg() -> Arg {
    Arg::new("year")
        .long("year")
        .value_parser(value_parser!(i32))
        .help("Calendar year, defaults to the current one")
}

fn document_cmd(name: &'static str, party: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand(
            Command::new("add")
                .about("Record a new document")
                .arg(Arg::new(party).long(party).required(true))
                .arg(Arg::new("total").long("total").required(true))
                .arg(Arg::new("date").long("date").help("Issue date, defaults to today"))
                .arg(Arg::new("due").long("due"))
                .arg(Arg::new("number").long("number").help("Document number, generated when omitted"))
                .arg(Arg::new("status").long("status").default_value("pending")),
        )
        .subcommand(
            Command::new("list")
                .arg(Arg::new("status").long("status"))
                .arg(
                    Arg::new("overdue")
                        .long("overdue")
                        .action(ArgAction::SetTrue)
                        .help("Only documents past their due date with a balance left"),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("pay")
                .about("Apply a payment")
                .arg(Arg::new("number").required(true))
                .arg(Arg::new("amount").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("guardian")
        .about("Guardian ERP finance and messaging client")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Path to config.yaml"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("init").about("Create the config file and local database"))
        .subcommand(
            Command::new("account")
                .about("Accounts and cash position")
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("type").long("type").help("bank|cash|receivable|payable"))
                        .args(json_args()),
                )
                .subcommand(Command::new("summary").args(json_args())),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("list")
                        .arg(period_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("status").long("status"))
                        .arg(
                            Arg::new("match")
                                .long("match")
                                .help("Regex over the description"),
                        )
                        .arg(Arg::new("limit").long("limit").value_parser(value_parser!(usize)))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("status").long("status").default_value("pending")),
                )
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("status").long("status")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true))
                        .arg(yes_arg()),
                )
                .subcommand(
                    Command::new("bulk-rm")
                        .arg(Arg::new("ids").required(true).num_args(1..))
                        .arg(yes_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Budgets")
                .subcommand(Command::new("list").arg(year_arg()).args(json_args()))
                .subcommand(Command::new("report").arg(year_arg()).args(json_args())),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboard statistics")
                .subcommand(Command::new("revenue").arg(period_arg()).args(json_args()))
                .subcommand(Command::new("cashflow").arg(year_arg()).args(json_args()))
                .subcommand(Command::new("payables").args(json_args()))
                .subcommand(Command::new("receivables").args(json_args()))
                .subcommand(Command::new("cash").args(json_args()))
                .subcommand(Command::new("tax").arg(year_arg()).args(json_args()))
                .subcommand(Command::new("expenses").args(json_args()))
                .subcommand(
                    Command::new("audit")
                        .arg(Arg::new("action").long("action"))
                        .arg(Arg::new("user").long("user"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .default_value("50"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export records to CSV or JSON")
                .subcommand_required(true)
                .subcommands(["transactions", "expenses", "budgets", "accounts"].map(|name| {
                    Command::new(name)
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .help("csv|json, guessed from --out when omitted"),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                })),
        )
        .subcommand(
            Command::new("chat")
                .about("Internal messaging")
                .subcommand(Command::new("conversations").args(json_args()))
                .subcommand(
                    Command::new("contacts")
                        .arg(
                            Arg::new("online")
                                .long("online")
                                .action(ArgAction::SetTrue)
                                .help("Hide offline contacts"),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("open")
                        .arg(Arg::new("conversation").required(true))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("send")
                        .arg(Arg::new("conversation").required(true))
                        .arg(Arg::new("content").default_value(""))
                        .arg(Arg::new("file-url").long("file-url"))
                        .arg(Arg::new("file-name").long("file-name").requires("file-url")),
                )
                .subcommand(
                    Command::new("search")
                        .arg(Arg::new("query").required(true))
                        .args(json_args()),
                )
                .subcommand(Command::new("join").arg(Arg::new("channel").required(true)))
                .subcommand(
                    Command::new("create")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("direct")
                                .help("direct|group|channel"),
                        )
                        .arg(Arg::new("name").long("name"))
                        .arg(
                            Arg::new("member")
                                .long("member")
                                .action(ArgAction::Append)
                                .required(true),
                        ),
                ),
        )
        .subcommand(document_cmd("bill", "vendor", "Vendor bills (local store)"))
        .subcommand(document_cmd("invoice", "customer", "Customer invoices (local store)"))
        .subcommand(
            Command::new("inventory")
                .about("Inventory items and stock movements (local store)")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("sku").long("sku").required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("cost").long("cost").required(true))
                        .arg(Arg::new("stock").long("stock").default_value("0"))
                        .arg(Arg::new("reorder").long("reorder")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("move")
                        .arg(Arg::new("sku").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("in|out|adjustment"),
                        )
                        .arg(Arg::new("qty").long("qty").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("cost").long("cost"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("reference").long("reference")),
                )
                .subcommand(
                    Command::new("history")
                        .arg(Arg::new("sku").required(true))
                        .args(json_args()),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored and fetched records for inconsistencies"))
}
