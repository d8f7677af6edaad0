use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use core_mechanics::board::Board;
use core_mechanics::original_game::{get_original_game_board, new_roster};
use core_mechanics::player::Player;
use core_mechanics::strategy::GreedyStrategy;
use iroh::{protocol::Router, Endpoint, NodeAddr, NodeId};
use iroh_gossip::{
    net::{Gossip, GossipReceiver, GossipSender},
    proto::TopicId,
};
use office_quest::{
    command::{Command, HELP},
    local_game::{run_local_game, LocalGameOptions},
    network_message::Message,
    network_subscribe::{publish, subscribe_client_loop, subscribe_server_loop, Table},
    oracle::HeuristicOracle,
    terminal::{render_board, spawn_input_reader},
    ticket::Ticket,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{watch, Mutex};
use tracing::info;

/// Office Quest
///
/// Trade gems for office tasks, win over the directors and be the first to
/// earn your vacation. Play against the computer, share a terminal, or meet
/// at a peer-to-peer table.
#[derive(Parser, Debug)]
struct Args {
    /// Set the bind port for our socket. By default, a random port will be used.
    #[clap(short, long, default_value = "0")]
    bind_port: u16,
    /// Seed for shuffling, to replay the same deal.
    #[clap(long)]
    seed: Option<u64>,
    /// How long an AI seat may think before its default move is played.
    #[clap(long, default_value = "5000")]
    oracle_timeout_ms: u64,
    /// Pause before each AI move.
    #[clap(long, default_value = "600")]
    ai_delay_ms: u64,
    #[clap(subcommand)]
    command: GameMode,
}

#[derive(Parser, Debug)]
enum GameMode {
    /// Play against computer opponents.
    Solo {
        #[clap(long, default_value = "Player")]
        name: String,
        /// Number of computer opponents.
        #[clap(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=3))]
        opponents: u8,
    },
    /// Several people take turns at this terminal.
    Local {
        /// Names of the human players, in seat order.
        #[clap(required = true)]
        names: Vec<String>,
        /// Number of computer opponents to add after the humans.
        #[clap(long, default_value = "0")]
        ai: u8,
    },
    /// Creates a new table and print a ticket for others to join.
    Create {
        #[clap(long, default_value = "Host")]
        name: String,
    },
    /// Join a table from a ticket.
    Join {
        /// The ticket, as base32 string.
        ticket: String,
        #[clap(long, default_value = "Guest")]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    match &args.command {
        GameMode::Solo { name, opponents } => {
            play_on_this_terminal(&args, new_roster(&[name.clone()], *opponents as usize), rng).await
        }
        GameMode::Local { names, ai } => {
            play_on_this_terminal(&args, new_roster(names, *ai as usize), rng).await
        }
        GameMode::Create { .. } | GameMode::Join { .. } => play_over_the_network(&args, rng).await,
    }
}

async fn play_on_this_terminal(
    args: &Args,
    roster: Vec<Player>,
    mut rng: ChaCha8Rng,
) -> Result<()> {
    let board = get_original_game_board(roster, &mut rng)?;
    let options = LocalGameOptions {
        oracle_timeout: Duration::from_millis(args.oracle_timeout_ms),
        ai_delay: Duration::from_millis(args.ai_delay_ms),
    };
    let oracle = HeuristicOracle::new(GreedyStrategy, Duration::ZERO);

    let board = run_local_game(board, &oracle, options, spawn_input_reader()).await?;
    info!(turns = board.get_turn_count(), winner = ?board.get_winner(), "game finished");
    Ok(())
}

async fn play_over_the_network(args: &Args, rng: ChaCha8Rng) -> Result<()> {
    let p2p_network = get_network_parameters(&args.command, args.bind_port).await?;

    // print a ticket that includes our own node id and endpoint addresses
    println!("> Ticket to join this table: {}", p2p_network.ticket);

    // join the gossip topic by connecting to known nodes, if any
    let (sender, receiver) = join_p2p_network(&p2p_network).await?;
    println!("> connected!");
    println!("{}", HELP);

    let my_id = p2p_network.endpoint.node_id();
    let role = match &args.command {
        GameMode::Create { name } => {
            let table = Arc::new(Mutex::new(Table::new(my_id, name.clone(), rng)));
            tokio::spawn(subscribe_server_loop(receiver, sender.clone(), table.clone()));
            Role::Host(table)
        }
        GameMode::Join { name, .. } => {
            let (board_tx, board_rx) = watch::channel(None);
            tokio::spawn(subscribe_client_loop(receiver, board_tx));
            Role::Guest {
                name: name.clone(),
                latest_board: board_rx,
            }
        }
        _ => bail!("not a network game mode"),
    };

    listen_for_local_input(sender, my_id, role).await?;

    p2p_network.router.shutdown().await?;

    Ok(())
}

enum Role {
    Host(Arc<Mutex<Table>>),
    Guest {
        name: String,
        latest_board: watch::Receiver<Option<Board>>,
    },
}

async fn join_p2p_network(
    p2p_network: &InitialNetworkConnection,
) -> Result<(GossipSender, GossipReceiver)> {
    let node_ids = p2p_network.nodes.iter().map(|p| p.node_id).collect();
    if p2p_network.nodes.is_empty() {
        println!("> waiting for players to join us...");
    } else {
        println!("> trying to connect to peers...");
        // add the peer addrs from the ticket to our endpoint's addressbook so that they can be dialed
        for node in p2p_network.nodes.clone().into_iter() {
            p2p_network.endpoint.add_node_addr(node)?;
        }
    };
    let (sender, receiver) = p2p_network
        .gossip
        .subscribe_and_join(p2p_network.topic, node_ids)
        .await?
        .split();

    Ok((sender, receiver))
}

struct InitialNetworkConnection {
    topic: TopicId,
    nodes: Vec<NodeAddr>,
    endpoint: Endpoint,
    gossip: Gossip,
    router: Router,
    ticket: Ticket,
}

async fn get_network_parameters(
    command: &GameMode,
    bind_port: u16,
) -> Result<InitialNetworkConnection> {
    let (topic, nodes) = match command {
        GameMode::Join { ticket, .. } => {
            let ticket = Ticket::from_str(ticket)?;
            let topic = ticket.topic();
            let nodes = Vec::from(ticket.nodes());
            println!("> Connecting to the table {topic}");
            (topic, nodes)
        }
        _ => {
            let topic = TopicId::from_bytes(rand::random());
            println!("> Opening a new table ({topic})");
            (topic, vec![])
        }
    };

    let endpoint = Endpoint::builder()
        .discovery_n0()
        .bind_addr_v4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, bind_port))
        .bind()
        .await?;

    println!("> Our node id: {}", endpoint.node_id());
    let mib = 1024usize.pow(2);
    let gossip = Gossip::builder()
        .max_message_size(mib)
        .spawn(endpoint.clone())
        .await?;

    let router = Router::builder(endpoint.clone())
        .accept(iroh_gossip::ALPN, gossip.clone())
        .spawn()
        .await?;

    let ticket = {
        let me = endpoint.node_addr().await?;
        let nodes = vec![me];
        Ticket::new(topic, nodes)
    };

    Ok(InitialNetworkConnection {
        endpoint,
        gossip,
        nodes,
        router,
        topic,
        ticket,
    })
}

async fn listen_for_local_input(sender: GossipSender, my_id: NodeId, role: Role) -> Result<()> {
    let mut line_rx = spawn_input_reader();

    while let Some(user_input) = line_rx.recv().await {
        let command = match user_input.parse::<Command>() {
            Ok(command) => command,
            Err(error) => {
                println!("! {}", error);
                continue;
            }
        };

        let message = match (&role, command) {
            (_, Command::Quit) => break,
            (_, Command::Help) => {
                println!("{}", HELP);
                continue;
            }
            (Role::Host(table), Command::Show) => {
                match table.lock().await.board() {
                    Some(board) => print!("{}", render_board(board)),
                    None => println!("! the game hasn't started yet"),
                }
                continue;
            }
            (Role::Guest { latest_board, .. }, Command::Show) => {
                match latest_board.borrow().as_ref() {
                    Some(board) => print!("{}", render_board(board)),
                    None => println!("! no board received yet"),
                }
                continue;
            }
            (Role::Host(_), Command::Join) => {
                println!("! you already sit at your own table");
                continue;
            }
            (Role::Guest { name, .. }, Command::Join) => Message::join_table(my_id, name.clone()),
            (_, Command::Start) => Message::start_game(my_id),
            (_, Command::Play(action)) => Message::action(my_id, action),
        };

        match &role {
            // the host's own moves never come back through gossip
            Role::Host(table) => {
                let replies = table.lock().await.handle(message);
                publish(&sender, replies).await?;
            }
            Role::Guest { .. } => {
                sender.broadcast(message.to_vec()?.into()).await?;
            }
        }
    }

    Ok(())
}
