// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use unival::admin::ReportRange;
use unival::backend;
use unival::models::{
    CourseUpdate, FacultyProfile, NewSchedule, ReactionKind, Role, StudentProfile,
};
use unival::scheduling::CalendarEntry;
use unival::utils::logging::{
    format_error, format_heading, format_info, format_success, format_warning,
};
use unival::{
    AdminService, AuthService, CommentService, Config, Dashboard, DashboardService,
    EvaluationDraft, EvaluationService, PortalStore, Registration, ReportKind, Session,
    SessionStore, UserQuery, Validator,
};

#[derive(Parser)]
#[command(name = "unival")]
#[command(version = "0.1.0")]
#[command(about = "Faculty scheduling and evaluation portal client", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Use the built-in sample data instead of the backend
    #[arg(long, action = ArgAction::SetTrue)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Login {
        email: String,

        #[arg(long, env = "UNIVAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    Logout,

    Whoami,

    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "UNIVAL_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        role: Role,

        #[arg(long)]
        department: String,

        /// Required for students
        #[arg(long)]
        year: Option<u8>,

        #[arg(long)]
        specialization: Option<String>,

        #[arg(long)]
        office_location: Option<String>,

        #[arg(long)]
        office_hours: Option<String>,

        #[arg(long)]
        qualification: Option<String>,

        #[arg(long)]
        experience_years: Option<u32>,

        #[arg(long)]
        research_interests: Option<String>,

        #[arg(long)]
        enrollment_number: Option<String>,

        #[arg(long)]
        major: Option<String>,

        #[arg(long)]
        minor: Option<String>,
    },

    Dashboard,

    Courses {
        #[arg(short, long)]
        department: Option<String>,
    },

    Rooms {
        /// Include rooms that are not available
        #[arg(long)]
        all: bool,
    },

    Slots {
        #[arg(short, long)]
        day: Option<String>,
    },

    Cohorts {
        #[arg(short, long)]
        department: Option<String>,
    },

    Schedules,

    Evaluations {
        #[command(subcommand)]
        command: EvaluationCommands,
    },

    Comments {
        #[command(subcommand)]
        command: CommentCommands,
    },

    React {
        evaluation: String,

        /// Emoji or name: done, worried, repeat, thumbs-up, thumbs-down, heart
        reaction: ReactionKind,

        #[arg(long)]
        comment: Option<String>,
    },

    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    Course {
        #[command(subcommand)]
        command: CourseCommands,
    },

    Report {
        /// user-activity, course-enrollment, evaluation-schedule or system-usage
        kind: ReportKind,

        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,
    },

    Faculty,

    ScheduleCreate {
        #[arg(long)]
        course: String,

        #[arg(long)]
        faculty: String,

        #[arg(long)]
        cohort: String,

        #[arg(long)]
        room: String,

        #[arg(long)]
        slot: String,

        #[arg(long)]
        semester: String,

        #[arg(long)]
        academic_year: String,

        #[arg(long)]
        inactive: bool,
    },
}

#[derive(Subcommand)]
enum EvaluationCommands {
    List {
        #[arg(long)]
        course: Option<String>,

        #[arg(long)]
        faculty: Option<String>,
    },

    Add {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        subject: String,

        #[arg(long, default_value = "quiz")]
        kind: String,

        #[arg(long)]
        date: NaiveDate,

        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,

        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,

        #[arg(long)]
        course: Option<String>,

        #[arg(long)]
        room: Option<String>,

        /// Calendar owner, defaults to the logged-in user
        #[arg(long)]
        faculty: Option<String>,
    },

    Calendar {
        #[arg(long)]
        faculty: Option<String>,
    },

    /// Selectable start and end times
    Times,
}

#[derive(Subcommand)]
enum CommentCommands {
    Show {
        evaluation: String,
    },

    Post {
        evaluation: String,

        text: String,

        #[arg(long)]
        reply_to: Option<String>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    List {
        #[arg(long)]
        role: Option<Role>,

        #[arg(short, long)]
        search: Option<String>,
    },

    SetRole {
        user_id: String,

        role: Role,
    },

    Delete {
        user_id: String,
    },
}

#[derive(Subcommand)]
enum CourseCommands {
    Update {
        course_id: String,

        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        department: Option<String>,
    },

    Delete {
        course_id: String,
    },
}

fn parse_time(value: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|e| format!("expected HH:MM, got {:?}: {}", value, e))
}

struct App {
    config: Config,
    store: Arc<dyn PortalStore>,
    sessions: SessionStore,
}

impl App {
    async fn session(&self) -> Result<Session> {
        self.sessions
            .require()
            .await
            .context("A logged-in session is required")
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    unival::utils::logging::init_logger(cli.color, cli.verbose);
    if !cli.color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    let store = backend::open(&config, cli.offline).context("Failed to open the backend")?;
    let sessions = SessionStore::new(config.session.path.clone());
    let app = App {
        config,
        store,
        sessions,
    };

    match cli.command {
        Commands::Login { email, password } => cmd_login(&app, &email, &password).await?,
        Commands::Logout => cmd_logout(&app).await?,
        Commands::Whoami => cmd_whoami(&app).await?,
        Commands::Register {
            name,
            email,
            password,
            role,
            department,
            year,
            specialization,
            office_location,
            office_hours,
            qualification,
            experience_years,
            research_interests,
            enrollment_number,
            major,
            minor,
        } => {
            let faculty = FacultyProfile {
                specialization,
                office_location,
                office_hours,
                qualification,
                experience_years,
                research_interests,
                ..Default::default()
            };
            let student = StudentProfile {
                enrollment_number,
                major,
                minor,
                ..Default::default()
            };
            let registration = Registration {
                name,
                email,
                password,
                role: Some(role),
                department,
                year,
                faculty: (faculty != FacultyProfile::default()).then_some(faculty),
                student: (student != StudentProfile::default()).then_some(student),
            };
            cmd_register(&app, registration).await?
        }
        Commands::Dashboard => cmd_dashboard(&app).await?,
        Commands::Courses { department } => cmd_courses(&app, department.as_deref()).await?,
        Commands::Rooms { all } => cmd_rooms(&app, all).await?,
        Commands::Slots { day } => cmd_slots(&app, day.as_deref()).await?,
        Commands::Cohorts { department } => cmd_cohorts(&app, department.as_deref()).await?,
        Commands::Schedules => cmd_schedules(&app).await?,
        Commands::Evaluations { command } => cmd_evaluations(&app, command).await?,
        Commands::Comments { command } => cmd_comments(&app, command).await?,
        Commands::React {
            evaluation,
            reaction,
            comment,
        } => cmd_react(&app, &evaluation, reaction, comment.as_deref()).await?,
        Commands::Users { command } => cmd_users(&app, command).await?,
        Commands::Course { command } => cmd_course(&app, command).await?,
        Commands::Report { kind, from, to } => {
            cmd_report(&app, kind, ReportRange { from, to }).await?
        }
        Commands::Faculty => cmd_faculty(&app).await?,
        Commands::ScheduleCreate {
            course,
            faculty,
            cohort,
            room,
            slot,
            semester,
            academic_year,
            inactive,
        } => {
            let schedule = NewSchedule {
                course_id: course,
                faculty_id: faculty,
                cohort_id: cohort,
                room_id: room,
                slot_id: slot,
                semester,
                academic_year,
                is_active: !inactive,
            };
            cmd_schedule_create(&app, schedule).await?
        }
    }

    Ok(())
}

fn admin_service(app: &App) -> AdminService {
    AdminService::new(Arc::clone(&app.store)).with_offline(&app.config.offline)
}

async fn cmd_login(app: &App, email: &str, password: &str) -> Result<()> {
    let auth = AuthService::new(Arc::clone(&app.store)).with_offline(&app.config.offline);
    let session = auth.login(email, password).await.context("Login failed")?;

    app.sessions
        .save(&session)
        .await
        .context("Failed to save session")?;

    println!(
        "{}",
        format_success(&format!(
            "Welcome, {} ({}, {})",
            session.name, session.role, session.department
        ))
    );
    Ok(())
}

async fn cmd_logout(app: &App) -> Result<()> {
    if app.sessions.clear().await? {
        println!("{}", format_success("Logged out"));
    } else {
        println!("{}", format_info("Not logged in"));
    }
    Ok(())
}

async fn cmd_whoami(app: &App) -> Result<()> {
    let session = app.session().await?;
    println!("{}", format_heading(&session.name));
    println!("Email:      {}", session.email);
    println!("Role:       {}", session.role);
    println!("Department: {}", session.department);
    println!("User id:    {}", session.user_id);
    Ok(())
}

async fn cmd_register(app: &App, registration: Registration) -> Result<()> {
    let auth = AuthService::new(Arc::clone(&app.store));
    let user = auth
        .register(registration)
        .await
        .context("Registration failed")?;

    println!(
        "{}",
        format_success(&format!("Registered {} as {}", user.email, user.role))
    );
    println!("{}", format_info("You can now log in with `unival login`"));
    Ok(())
}

async fn cmd_dashboard(app: &App) -> Result<()> {
    let session = app.session().await?;
    let dashboard = DashboardService::new(Arc::clone(&app.store))
        .summary(&session)
        .await
        .context("Failed to load dashboard")?;

    println!(
        "{}",
        format_heading(&format!("{} dashboard: {}", session.role, session.name))
    );

    match dashboard {
        Dashboard::Admin {
            users,
            courses,
            evaluations,
        } => {
            println!("Users:       {}", users);
            println!("Courses:     {}", courses);
            println!("Evaluations: {}", evaluations);
        }
        Dashboard::Faculty {
            schedules,
            evaluations,
        } => {
            println!("\nSchedules ({})", schedules.len());
            for schedule in &schedules {
                println!(
                    "  {}  course {}  room {}  slot {}  {} {}",
                    schedule.schedule_id,
                    schedule.course_id,
                    schedule.room_id.as_deref().unwrap_or("-"),
                    schedule.slot_id.as_deref().unwrap_or("-"),
                    schedule.semester,
                    schedule.academic_year
                );
            }
            println!("\nEvaluations ({})", evaluations.len());
            for evaluation in &evaluations {
                println!(
                    "  {}  {}  {}",
                    evaluation.interval(),
                    evaluation.title,
                    evaluation.evaluation_id
                );
            }
        }
        Dashboard::Student {
            department,
            courses,
        } => {
            println!("\nCourses in {} ({})", department, courses.len());
            for course in &courses {
                println!("  {:<10} {}", course.code, course.name);
            }
        }
    }
    Ok(())
}

async fn cmd_courses(app: &App, department: Option<&str>) -> Result<()> {
    let courses = DashboardService::new(Arc::clone(&app.store))
        .courses(department)
        .await
        .context("Failed to list courses")?;

    println!("{}", format_heading("Courses"));
    if courses.is_empty() {
        println!("{}", format_info("No courses found"));
    }
    for course in &courses {
        println!(
            "{:<10} {:<35} {}",
            course.code,
            Validator::truncate_text(&course.name, 32),
            course.department.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn cmd_rooms(app: &App, all: bool) -> Result<()> {
    let rooms = DashboardService::new(Arc::clone(&app.store))
        .rooms(!all)
        .await
        .context("Failed to list rooms")?;

    println!("{}", format_heading("Rooms"));
    for room in &rooms {
        let capacity = room
            .capacity
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string());
        let status = if room.is_available {
            "available"
        } else {
            "unavailable"
        };
        println!(
            "{:<8} {:<20} capacity {:<5} {}",
            room.room_id, room.name, capacity, status
        );
    }
    Ok(())
}

async fn cmd_slots(app: &App, day: Option<&str>) -> Result<()> {
    let slots = DashboardService::new(Arc::clone(&app.store))
        .time_slots(day)
        .await
        .context("Failed to list time slots")?;

    println!("{}", format_heading("Time slots"));
    for slot in &slots {
        println!(
            "{:<10} {:<10} {} - {}",
            slot.slot_id, slot.day_of_week, slot.start_time, slot.end_time
        );
    }
    Ok(())
}

async fn cmd_cohorts(app: &App, department: Option<&str>) -> Result<()> {
    let cohorts = DashboardService::new(Arc::clone(&app.store))
        .cohorts(department)
        .await
        .context("Failed to list cohorts")?;

    println!("{}", format_heading("Cohorts"));
    for cohort in &cohorts {
        println!("{:<12} {}", cohort.cohort_id, cohort.name);
    }
    Ok(())
}

async fn cmd_schedules(app: &App) -> Result<()> {
    let session = app.session().await?;
    let schedules = DashboardService::new(Arc::clone(&app.store))
        .schedules(&session)
        .await
        .context("Failed to list schedules")?;

    println!("{}", format_heading("Schedules"));
    for schedule in &schedules {
        let status = if schedule.is_active { "" } else { " (inactive)" };
        println!(
            "{}  course {}  faculty {}  cohort {}  room {}  slot {}  {} {}{}",
            schedule.schedule_id,
            schedule.course_id,
            schedule.faculty_id,
            schedule.cohort_id.as_deref().unwrap_or("-"),
            schedule.room_id.as_deref().unwrap_or("-"),
            schedule.slot_id.as_deref().unwrap_or("-"),
            schedule.semester,
            schedule.academic_year,
            status
        );
    }
    Ok(())
}

async fn cmd_evaluations(app: &App, command: EvaluationCommands) -> Result<()> {
    let service = EvaluationService::new(
        Arc::clone(&app.store),
        (&app.config.scheduling).into(),
    );

    match command {
        EvaluationCommands::List { course, faculty } => {
            let evaluations = match (course, faculty) {
                (Some(course), _) => service.list_for_course(&course).await?,
                (None, Some(faculty)) => service.list_for_faculty(&faculty).await?,
                (None, None) => {
                    let session = app.session().await?;
                    service.list_for_faculty(&session.user_id).await?
                }
            };

            println!("{}", format_heading("Evaluations"));
            if evaluations.is_empty() {
                println!("{}", format_info("No evaluations found"));
            }
            for evaluation in &evaluations {
                let published = if evaluation.is_published {
                    ""
                } else {
                    " (draft)"
                };
                println!(
                    "{}  {:<20} {:<6} {}{}",
                    evaluation.interval(),
                    evaluation.title,
                    evaluation.kind,
                    evaluation.evaluation_id,
                    published
                );
            }
        }
        EvaluationCommands::Add {
            title,
            description,
            subject,
            kind,
            date,
            start,
            end,
            course,
            room,
            faculty,
        } => {
            let session = app.session().await?;
            let draft = EvaluationDraft {
                title,
                description,
                subject,
                kind,
                date,
                start_time: start,
                end_time: end,
                course_id: course,
                room_id: room,
                faculty_id: faculty,
            };

            let created = match service.schedule(&session, draft).await {
                Ok(created) => created,
                Err(unival::PortalError::Schedule(conflict)) => {
                    println!("{}", format_warning(&conflict.to_string()));
                    return Err(anyhow::anyhow!("Evaluation not scheduled"));
                }
                Err(e) => return Err(e).context("Failed to schedule evaluation"),
            };

            let calendar = service.calendar_for(&created.faculty_id).await?;
            let label = calendar.label(&CalendarEntry::from(&created));
            println!(
                "{}",
                format_success(&format!(
                    "Scheduled {} on {} ({})",
                    label,
                    created.interval(),
                    created.evaluation_id
                ))
            );
        }
        EvaluationCommands::Calendar { faculty } => {
            let owner = match faculty {
                Some(faculty) => faculty,
                None => app.session().await?.user_id,
            };
            let calendar = service
                .calendar_for(&owner)
                .await
                .context("Failed to load calendar")?;

            println!("{}", format_heading(&format!("Calendar of {}", owner)));
            if calendar.is_empty() {
                println!("{}", format_info("No evaluations scheduled"));
            }
            for (date, entries) in calendar.by_day() {
                println!("\n{} ({})", date.format("%a %Y-%m-%d"), date.format("%B"));
                for entry in entries {
                    println!(
                        "  {}-{}  {}",
                        entry.interval.start.format("%H:%M"),
                        entry.interval.end.format("%H:%M"),
                        calendar.label(entry)
                    );
                }
            }
        }
        EvaluationCommands::Times => {
            let options: Vec<String> = service
                .time_options()
                .iter()
                .map(|time| time.format("%H:%M").to_string())
                .collect();
            println!("{}", options.join(" "));
        }
    }
    Ok(())
}

async fn cmd_comments(app: &App, command: CommentCommands) -> Result<()> {
    let service = CommentService::new(Arc::clone(&app.store));

    match command {
        CommentCommands::Show { evaluation } => {
            let view = service
                .thread(&evaluation)
                .await
                .context("Failed to load comments")?;
            println!("{}", format_heading(&format!("Comments on {}", evaluation)));
            println!("{}\n", view.evaluation_tally);
            print!("{}", view.render());
        }
        CommentCommands::Post {
            evaluation,
            text,
            reply_to,
        } => {
            let session = app.session().await?;
            let comment = service
                .post(&session, &evaluation, &text, reply_to.as_deref())
                .await
                .context("Failed to post comment")?;
            println!(
                "{}",
                format_success(&format!("Posted comment {}", comment.comment_id))
            );
        }
    }
    Ok(())
}

async fn cmd_react(
    app: &App,
    evaluation: &str,
    reaction: ReactionKind,
    comment: Option<&str>,
) -> Result<()> {
    let session = app.session().await?;
    let tally = CommentService::new(Arc::clone(&app.store))
        .react(&session, evaluation, comment, reaction)
        .await
        .context("Failed to add reaction")?;
    println!("{}", tally);
    Ok(())
}

async fn cmd_users(app: &App, command: UserCommands) -> Result<()> {
    let session = app.session().await?;
    let service = admin_service(app);

    match command {
        UserCommands::List { role, search } => {
            let users = service
                .users(&session, &UserQuery { role, search })
                .await
                .context("Failed to list users")?;
            println!("{}", format_heading(&format!("Users ({})", users.len())));
            for user in &users {
                println!(
                    "{:<38} {:<24} {:<28} {}",
                    user.id, user.name, user.email, user.role
                );
            }
        }
        UserCommands::SetRole { user_id, role } => {
            service
                .set_role(&session, &user_id, role)
                .await
                .context("Failed to update role")?;
            println!(
                "{}",
                format_success(&format!("{} is now {}", user_id, role))
            );
        }
        UserCommands::Delete { user_id } => {
            service
                .delete_user(&session, &user_id)
                .await
                .context("Failed to delete user")?;
            println!("{}", format_success(&format!("Deleted user {}", user_id)));
        }
    }
    Ok(())
}

async fn cmd_course(app: &App, command: CourseCommands) -> Result<()> {
    let session = app.session().await?;
    let service = admin_service(app);

    match command {
        CourseCommands::Update {
            course_id,
            code,
            name,
            department,
        } => {
            let course = service
                .update_course(
                    &session,
                    &course_id,
                    &CourseUpdate {
                        code,
                        name,
                        department,
                    },
                )
                .await
                .context("Failed to update course")?;
            println!(
                "{}",
                format_success(&format!("Updated {} {}", course.code, course.name))
            );
        }
        CourseCommands::Delete { course_id } => {
            service
                .delete_course(&session, &course_id)
                .await
                .context("Failed to delete course")?;
            println!(
                "{}",
                format_success(&format!("Deleted course {}", course_id))
            );
        }
    }
    Ok(())
}

async fn cmd_report(app: &App, kind: ReportKind, range: ReportRange) -> Result<()> {
    let session = app.session().await?;
    let report = admin_service(app)
        .report(&session, kind, range)
        .await
        .context("Failed to generate report")?;

    println!("{}", format_heading(report.kind.title()));
    if report.is_empty() {
        println!("{}", format_info("No data available for this report"));
    }
    for row in &report.rows {
        println!("{:<36} {}", row.label, row.detail);
    }
    Ok(())
}

async fn cmd_faculty(app: &App) -> Result<()> {
    let session = app.session().await?;
    let members = admin_service(app)
        .faculty(&session)
        .await
        .context("Failed to list faculty")?;

    println!("{}", format_heading("Faculty"));
    for member in &members {
        println!(
            "{:<24} {:<28} {}",
            member.name,
            member.email.as_deref().unwrap_or("-"),
            member.profile.specialization.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn cmd_schedule_create(app: &App, schedule: NewSchedule) -> Result<()> {
    let session = app.session().await?;
    let created = admin_service(app)
        .create_schedule(&session, schedule)
        .await
        .context("Failed to create schedule")?;

    println!(
        "{}",
        format_success(&format!("Created schedule {}", created.schedule_id))
    );
    Ok(())
}
