mod cli;
mod tables;

use clap::{Parser, crate_version};
use pack_runtime::{
    field::{Card, FieldId, GroupId, GroupKind, Role},
    prelude::*,
    scenario::Scenario,
    session::Session,
    settings::Settings,
};

use crate::{
    cli::{Args, Command, LoadArgs, PackArgs, PlanArgs, RuntimeArgs, SizeArgs},
    tables::{build_group_table, build_report_table},
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let mut session = Session::new(Settings::load(args.settings_path.as_deref())?);

    match args.command {
        Command::Runtime(args) => {
            runtime(&mut session, *args)?;
            print_card(&session, Card::Runtime)?;
        }
        Command::Plan(args) => {
            plan(&mut session, *args)?;
            print_card(&session, Card::Planner)?;
        }
        Command::Size(args) => {
            size(&mut session, *args)?;
            print_card(&session, Card::Sizing)?;
        }
        Command::Replay(args) => {
            let rejections = Scenario::load(&args.path)?.replay(&mut session)?;
            for card in [Card::Runtime, Card::Planner, Card::Sizing] {
                print_card(&session, card)?;
            }
            ensure!(rejections.is_empty(), "{} edit(s) rejected", rejections.len());
        }
    }

    Ok(())
}

fn runtime(session: &mut Session, args: RuntimeArgs) -> Result {
    let pack = GroupId::new(Card::Runtime, GroupKind::Pack);
    let load = GroupId::new(Card::Runtime, GroupKind::Load);
    enter(session, pack_entries(pack, args.pack))?;
    enter(session, load_entries(load, args.load))?;
    for text in args.extra_loads {
        let id = session.add_load();
        enter(session, [(id.field(Role::Nominal), Some(text))])?;
    }
    Ok(())
}

fn plan(session: &mut Session, args: PlanArgs) -> Result {
    let time = GroupId::new(Card::Planner, GroupKind::Time);
    enter(
        session,
        [(time.field(Role::Nominal), args.time), (time.field(Role::Min), args.time_min)],
    )?;
    enter(session, load_entries(GroupId::new(Card::Planner, GroupKind::Load), args.load))?;
    enter(session, pack_entries(GroupId::new(Card::Planner, GroupKind::Pack), args.pack))?;
    info!(path = ?session.path(), "planned");
    Ok(())
}

fn size(session: &mut Session, args: SizeArgs) -> Result {
    let energy = GroupId::new(Card::Sizing, GroupKind::Energy);
    let cell = GroupId::new(Card::Sizing, GroupKind::Cell);
    enter(
        session,
        [
            (energy.field(Role::Nominal), args.energy),
            (energy.field(Role::Min), args.energy_min),
            (energy.field(Role::Max), args.energy_max),
            (cell.field(Role::Nominal), args.capacity),
            (cell.field(Role::Count), args.cells),
        ],
    )
}

fn pack_entries(pack: GroupId, args: PackArgs) -> [(FieldId, Option<String>); 4] {
    [
        (pack.field(Role::Count), args.cells),
        (pack.field(Role::Nominal), args.capacity),
        (pack.field(Role::Min), args.capacity_min),
        (pack.field(Role::Max), args.capacity_max),
    ]
}

fn load_entries(load: GroupId, args: LoadArgs) -> [(FieldId, Option<String>); 3] {
    [
        (load.field(Role::Nominal), args.load),
        (load.field(Role::Min), args.load_min),
        (load.field(Role::Max), args.load_max),
    ]
}

/// Blur the fields one by one, as if the user typed the texts in this order.
fn enter(
    session: &mut Session,
    entries: impl IntoIterator<Item = (FieldId, Option<String>)>,
) -> Result {
    for (id, text) in entries {
        let Some(text) = text else { continue };
        let outcome = session.on_field_blur(id, &text)?;
        if let Some(error) = outcome.error {
            warn!(field = %id, %text, %error, "rejected");
        }
    }
    Ok(())
}

fn print_card(session: &Session, card: Card) -> Result {
    for id in session.group_ids(card) {
        let snapshot = session.group_snapshot(id)?;
        if snapshot.is_visible {
            println!("{}", build_group_table(&snapshot));
        }
    }
    println!("{}", build_report_table(&session.report(card)));
    Ok(())
}
