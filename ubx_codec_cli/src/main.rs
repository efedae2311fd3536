use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, info};
use std::{fs, path::PathBuf};
use ubx_codec::{
    layout::with_offsets, FieldDesc, MessageKind, MessageLayout, RawField, RawMessage,
    ReturnCode, UbxMessage,
};

fn input_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("file")
            .value_name("FILE")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Payload starting at the class/id pair"),
    )
    .arg(
        Arg::new("hex")
            .long("hex")
            .action(ArgAction::SetTrue)
            .help("Read the payload as hex text instead of raw bytes"),
    )
}

fn cli() -> Command {
    Command::new("ubx-codec")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Encode and decode bit-packed UBX RXM-RAWX and MGA-GPS-EPH payloads")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(input_args(
            Command::new("decode").about("Decode a payload into JSON"),
        ))
        .subcommand(input_args(
            Command::new("dump").about("List every field of a payload by walking its layout"),
        ))
        .subcommand(
            Command::new("encode")
                .about("Encode a JSON message into a payload")
                .arg(
                    Arg::new("json")
                        .value_name("JSON")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File holding a message as printed by `decode`"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("OUT")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("hex")
                        .long("hex")
                        .action(ArgAction::SetTrue)
                        .help("Write hex text instead of raw bytes"),
                ),
        )
        .subcommand(
            Command::new("layout")
                .about("Print the bit layout of a message")
                .arg(
                    Arg::new("message")
                        .required(true)
                        .value_parser(["rawx", "gps-eph"]),
                ),
        )
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .format_timestamp(None)
        .format_target(false)
        .filter_level(log::LevelFilter::Info)
        .parse_env("UBX_CODEC_LOGLEVEL")
        .init();

    match cli().get_matches().subcommand() {
        Some(("decode", args)) => decode(args),
        Some(("dump", args)) => dump(args),
        Some(("encode", args)) => encode(args),
        Some(("layout", args)) => layout(args),
        _ => unreachable!("subcommand is required"),
    }
}

fn read_input(args: &ArgMatches) -> Result<Vec<u8>> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("missing input file")?;
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let bytes = if args.get_flag("hex") {
        parse_hex(&String::from_utf8(data).context("hex input is not text")?)?
    } else {
        data
    };
    debug!("{}: {} bytes", path.display(), bytes.len());
    Ok(bytes)
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits");
    }
    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair)?;
            u8::from_str_radix(pair, 16).with_context(|| format!("invalid hex byte {:?}", pair))
        })
        .collect()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn decode(args: &ArgMatches) -> Result<()> {
    let bytes = read_input(args)?;
    let res = UbxMessage::decode(&bytes);
    let code = i8::from(ReturnCode::of(&res));
    match res {
        Ok(msg) => {
            println!("{}", serde_json::to_string_pretty(&msg)?);
            Ok(())
        },
        Err(err) => bail!("{} (return code {})", err, code),
    }
}

fn print_fields(indent: &str, fields: &[RawField]) {
    for field in fields {
        println!("{}{} = {}", indent, field.name, field.value);
    }
}

fn dump(args: &ArgMatches) -> Result<()> {
    let bytes = read_input(args)?;
    let raw = RawMessage::decode(&bytes)?;
    let layout = raw.kind.layout();
    println!("{} ({:#04x}/{:#04x})", layout.name, layout.class, layout.id);
    print_fields("  ", &raw.fields);
    if let Some(group) = &layout.group {
        for (i, item) in raw.items.iter().enumerate() {
            println!("  {}[{}]", group.name, i);
            print_fields("    ", item);
        }
    }
    Ok(())
}

fn encode(args: &ArgMatches) -> Result<()> {
    let input = args.get_one::<PathBuf>("json").context("missing JSON file")?;
    let output = args.get_one::<PathBuf>("output").context("missing output")?;

    let text = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let msg: UbxMessage = serde_json::from_str(&text).context("parsing message")?;
    let bytes = msg.to_bytes();
    info!(
        "{}: {} bits, {} bytes",
        msg.kind().layout().name,
        msg.encoded_bits(),
        bytes.len()
    );

    let written = if args.get_flag("hex") {
        fs::write(output, to_hex(&bytes) + "\n")
    } else {
        fs::write(output, &bytes)
    };
    written.with_context(|| format!("writing {}", output.display()))
}

fn print_table(fields: &'static [FieldDesc], start: usize) {
    for (offset, field) in with_offsets(fields, start) {
        println!(
            "  {:>5}  {:>2}  {:<8}  {}",
            offset,
            field.bits,
            format!("{:?}", field.kind),
            field.name
        );
    }
}

fn layout(args: &ArgMatches) -> Result<()> {
    let kind = match args.get_one::<String>("message").map(String::as_str) {
        Some("rawx") => MessageKind::RxmRawx,
        Some("gps-eph") => MessageKind::MgaGpsEph,
        other => bail!("unknown message {:?}", other),
    };
    let layout: &MessageLayout = kind.layout();

    println!("{} ({:#04x}/{:#04x})", layout.name, layout.class, layout.id);
    println!("  {:>5}  {:>2}  {:<8}  {}", "bit", "w", "kind", "field");
    println!("  {:>5}  {:>2}  {:<8}  {}", 0, 8, "Unsigned", "class");
    println!("  {:>5}  {:>2}  {:<8}  {}", 8, 8, "Unsigned", "id");
    print_table(layout.fields, ubx_codec::UBX_IDENT_BITS);
    println!("header: {} bits", layout.header_bits());

    if let Some(group) = &layout.group {
        println!(
            "{}: up to {} blocks of {} bits, count in `{}`",
            group.name,
            group.capacity,
            layout.block_bits(),
            group.count_field
        );
        print_table(group.fields, 0);
    }
    println!("largest message: {} bytes", layout.max_len());
    Ok(())
}
