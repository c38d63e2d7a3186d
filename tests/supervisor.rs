//! End-to-end supervisor scenarios with fake surfaces and a fake service.

use std::io;

use search_desk::app::{supervise, ExitStatus, NOT_CONFIGURED_MESSAGE};
use search_desk::service::{BindTarget, ServiceEvent, ServiceRunner};
use search_desk::shell::ShellEvent;
use search_desk::tray::TrayAction;
use search_desk::{Lifecycle, LifecycleState, SupervisorError};

mod common;
use common::{searchable_config, test_shell, FakeControl, ScriptedProvider};

fn local_8000() -> BindTarget {
    BindTarget::Tcp {
        host: "127.0.0.1".into(),
        port: 8000,
    }
}

#[test]
fn unconfigured_twice_exits_nonzero_without_start() {
    let provider = ScriptedProvider::new(vec![None, None]);
    let mut control = FakeControl::default();
    let mut shell = test_shell();
    let lifecycle = Lifecycle::new();
    shell.proxy().send(ShellEvent::SetupClosed { saved: false });

    let status = supervise(&provider, &mut control, &mut shell, &lifecycle);

    assert_eq!(status, ExitStatus::NotConfigured);
    assert_ne!(status.code(), 0);
    assert!(control.starts.is_empty());
    assert_eq!(provider.queries.get(), 2);
    assert_eq!(shell.setup().shown, 1);
    assert!(shell.tray().messages.iter().any(|m| m == NOT_CONFIGURED_MESSAGE));
    assert_eq!(lifecycle.current(), LifecycleState::Terminated);
}

#[test]
fn dismissed_setup_still_finds_config_written_elsewhere() {
    let provider = ScriptedProvider::new(vec![None, Some(searchable_config(8000))]);
    let mut control = FakeControl::default();
    let mut shell = test_shell();
    let lifecycle = Lifecycle::new();
    let proxy = shell.proxy();
    proxy.send(ShellEvent::SetupClosed { saved: false });
    proxy.send(ShellEvent::Menu(TrayAction::Quit));

    let status = supervise(&provider, &mut control, &mut shell, &lifecycle);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(provider.queries.get(), 2);
    assert_eq!(control.starts, vec![local_8000()]);
    assert_eq!(control.stop_count(), 1);
}

#[test]
fn closed_console_input_during_setup_exits_unconfigured() {
    let provider = ScriptedProvider::new(vec![None, None]);
    let mut control = FakeControl::default();
    let mut shell = test_shell();
    shell.proxy().send(ShellEvent::InputClosed);

    let status = supervise(&provider, &mut control, &mut shell, &Lifecycle::new());

    assert_eq!(status, ExitStatus::NotConfigured);
    assert_eq!(provider.queries.get(), 2);
    assert!(control.starts.is_empty());
}

#[test]
fn configured_at_launch_starts_once_with_bind_target() {
    let config = searchable_config(8000);
    let provider = ScriptedProvider::new(vec![Some(config.clone())]);
    let mut control = FakeControl::default();
    let mut shell = test_shell();
    let lifecycle = Lifecycle::new();
    shell.proxy().send(ShellEvent::Menu(TrayAction::Quit));

    let status = supervise(&provider, &mut control, &mut shell, &lifecycle);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(control.starts, vec![config.bind_target()]);
    assert_eq!(provider.queries.get(), 1);
    assert_eq!(shell.setup().shown, 0);
    assert_eq!(shell.tray().shown, 1);
    assert_eq!(control.stop_count(), 1);
}

#[test]
fn first_run_save_then_quit() {
    let provider = ScriptedProvider::new(vec![None, Some(searchable_config(8000))]);
    let mut control = FakeControl::default();
    let mut shell = test_shell();
    let lifecycle = Lifecycle::new();
    let proxy = shell.proxy();
    proxy.send(ShellEvent::SetupClosed { saved: true });
    proxy.send(ShellEvent::Menu(TrayAction::Quit));

    let status = supervise(&provider, &mut control, &mut shell, &lifecycle);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(shell.setup().shown, 1);
    assert_eq!(control.starts, vec![local_8000()]);
    assert_eq!(control.stop_count(), 1);
    assert_eq!(lifecycle.current(), LifecycleState::Terminated);
}

#[test]
fn search_opens_root_url_of_resolved_config() {
    let provider = ScriptedProvider::new(vec![Some(searchable_config(8123))]);
    let mut control = FakeControl::default();
    let mut shell = test_shell();
    let proxy = shell.proxy();
    proxy.send(ShellEvent::Menu(TrayAction::Search));
    proxy.send(ShellEvent::Input("quit".into()));

    let status = supervise(&provider, &mut control, &mut shell, &Lifecycle::new());

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(*shell.opener().opened.borrow(), vec!["http://127.0.0.1:8123/"]);
}

#[test]
fn configure_while_running_keeps_service() {
    let provider = ScriptedProvider::new(vec![Some(searchable_config(8000))]);
    let mut control = FakeControl::default();
    let mut shell = test_shell();
    let proxy = shell.proxy();
    proxy.send(ShellEvent::Service(ServiceEvent::Started {
        target: local_8000(),
        local_addr: "127.0.0.1:8000".into(),
    }));
    proxy.send(ShellEvent::Menu(TrayAction::Configure));
    proxy.send(ShellEvent::SetupClosed { saved: true });
    proxy.send(ShellEvent::Menu(TrayAction::Quit));

    let status = supervise(&provider, &mut control, &mut shell, &Lifecycle::new());

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(control.starts.len(), 1);
    assert_eq!(shell.setup().shown, 1);
    assert!(shell
        .tray()
        .messages
        .iter()
        .any(|m| m.contains("Restart search-desk to apply")));
}

#[test]
fn interrupt_behaves_like_quit() {
    let provider = ScriptedProvider::new(vec![Some(searchable_config(8000))]);
    let mut control = FakeControl::default();
    let mut shell = test_shell();
    shell.proxy().send(ShellEvent::Interrupt);

    let status = supervise(&provider, &mut control, &mut shell, &Lifecycle::new());

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(control.stop_count(), 1);
}

#[test]
fn quit_during_first_run_never_starts() {
    let provider = ScriptedProvider::new(vec![None, Some(searchable_config(8000))]);
    let mut control = FakeControl::default();
    let mut shell = test_shell();
    let lifecycle = Lifecycle::new();
    shell.proxy().send(ShellEvent::Menu(TrayAction::Quit));

    let status = supervise(&provider, &mut control, &mut shell, &lifecycle);

    assert_eq!(status, ExitStatus::Success);
    assert!(control.starts.is_empty());
    assert!(!shell.setup().visible);
    assert_eq!(lifecycle.current(), LifecycleState::Terminated);
}

#[test]
fn bind_failure_exits_with_service_failed() {
    let provider = ScriptedProvider::new(vec![Some(searchable_config(8000))]);
    let mut control = FakeControl::default();
    let mut shell = test_shell();
    shell
        .proxy()
        .send(ShellEvent::Service(ServiceEvent::Failed(SupervisorError::BindFailure {
            target: local_8000(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        })));

    let status = supervise(&provider, &mut control, &mut shell, &Lifecycle::new());

    assert_eq!(status, ExitStatus::ServiceFailed);
    assert_eq!(control.starts.len(), 1);
    assert_eq!(control.stop_count(), 1);
    assert!(shell
        .tray()
        .messages
        .iter()
        .any(|m| m.contains("failed to bind 127.0.0.1:8000")));
}

#[test]
fn refused_start_exits_with_service_failed() {
    let provider = ScriptedProvider::new(vec![Some(searchable_config(8000))]);
    let mut control = FakeControl {
        start_error: Some(SupervisorError::AlreadyRunning),
        ..FakeControl::default()
    };
    let mut shell = test_shell();

    let status = supervise(&provider, &mut control, &mut shell, &Lifecycle::new());

    assert_eq!(status, ExitStatus::ServiceFailed);
    assert_eq!(control.stop_count(), 0);
}

#[test]
fn stop_timeout_does_not_block_exit() {
    let provider = ScriptedProvider::new(vec![Some(searchable_config(8000))]);
    let mut control = FakeControl {
        stop_times_out: true,
        ..FakeControl::default()
    };
    let mut shell = test_shell();
    let lifecycle = Lifecycle::new();
    shell.proxy().send(ShellEvent::Menu(TrayAction::Quit));

    let status = supervise(&provider, &mut control, &mut shell, &lifecycle);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(control.stop_count(), 1);
    assert_eq!(lifecycle.current(), LifecycleState::Terminated);
}

#[test]
fn real_runner_is_released_on_quit() {
    let provider = ScriptedProvider::new(vec![Some(searchable_config(0))]);
    let mut shell = test_shell();
    let proxy = shell.proxy();
    let reporter = proxy.clone();
    let mut runner = ServiceRunner::new(move |event| {
        reporter.send(ShellEvent::Service(event));
    });
    proxy.send(ShellEvent::Menu(TrayAction::Quit));

    let status = supervise(&provider, &mut runner, &mut shell, &Lifecycle::new());

    assert_eq!(status, ExitStatus::Success);
    assert!(!runner.is_live());
}
