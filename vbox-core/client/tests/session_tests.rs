//! 会话与远程对象句柄测试

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use vbox_client::requests::operation;
use vbox_client::*;
use vbox_gateway::{Gateway, GatewayError, Payload, RETURN_VALUE};

/// 按操作名预设响应的桩网关，记录所有调用
#[derive(Default)]
struct StubGateway {
    calls: Mutex<Vec<(String, Payload)>>,
    responses: Mutex<HashMap<String, VecDeque<vbox_gateway::Result<Payload>>>>,
    delay: Option<Duration>,
}

impl StubGateway {
    fn new() -> Self {
        Self::default()
    }

    /// 追加一个响应；队列只剩最后一个时重复返回它
    fn respond(self, operation: &str, result: vbox_gateway::Result<Payload>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push_back(result);
        self
    }

    fn returning(self, operation: &str, value: &str) -> Self {
        self.respond(operation, Ok(Payload::new().with(RETURN_VALUE, value)))
    }

    fn failing(self, operation: &str, message: &str) -> Self {
        self.respond(
            operation,
            Err(GatewayError::Fault {
                code: "SOAP-ENV:Client".to_string(),
                message: message.to_string(),
            }),
        )
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> Vec<(String, Payload)> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_to(&self, operation: &str) -> Vec<Payload> {
        self.calls()
            .into_iter()
            .filter(|(op, _)| op == operation)
            .map(|(_, payload)| payload)
            .collect()
    }
}

#[async_trait]
impl Gateway for StubGateway {
    async fn invoke(&self, operation: &str, request: Payload) -> vbox_gateway::Result<Payload> {
        self.calls
            .lock()
            .unwrap()
            .push((operation.to_string(), request));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(operation) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(GatewayError::Transport(format!("未预设的操作: {}", operation))),
        }
    }

    fn endpoint(&self) -> &str {
        "http://stub:18083"
    }
}

fn logged_in_stub() -> StubGateway {
    StubGateway::new().returning(operation::LOGON, "session-1")
}

fn session_with(gateway: &Arc<StubGateway>, credentials: Credentials) -> Session {
    Session::new(gateway.clone(), credentials)
}

// ============================================
// 登录
// ============================================

#[tokio::test]
async fn test_new_session_is_not_logged_on() {
    let gateway = Arc::new(logged_in_stub());
    let session = session_with(&gateway, Credentials::anonymous());

    assert!(!session.is_logged_on());
    assert_eq!(session.session_id(), None);
    assert_eq!(session.endpoint(), "http://stub:18083");
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_fresh_session_logon_sends_credentials_once() {
    let gateway = Arc::new(logged_in_stub());
    let session = session_with(&gateway, Credentials::new("admin", "secret"));

    let handle = session.logon().await.unwrap();
    assert_eq!(handle, "session-1");

    let logons = gateway.calls_to(operation::LOGON);
    assert_eq!(logons.len(), 1);
    assert_eq!(logons[0].get("username"), Some("admin"));
    assert_eq!(logons[0].get("password"), Some("secret"));
    assert_eq!(gateway.calls().len(), 1);
}

#[tokio::test]
async fn test_logon_is_idempotent() {
    let gateway = Arc::new(logged_in_stub());
    let session = session_with(&gateway, Credentials::anonymous());

    let first = session.logon().await.unwrap().to_string();
    let second = session.logon().await.unwrap().to_string();

    assert_eq!(first, second);
    assert_eq!(session.session_id(), Some("session-1"));
    assert_eq!(gateway.calls_to(operation::LOGON).len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logon_issues_single_call() {
    let gateway = Arc::new(logged_in_stub().with_delay(Duration::from_millis(50)));
    let session = Arc::new(session_with(&gateway, Credentials::anonymous()));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.logon().await.map(str::to_string) })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), "session-1");
    }
    assert_eq!(gateway.calls_to(operation::LOGON).len(), 1);
}

#[tokio::test]
async fn test_failed_logon_can_be_retried() {
    let gateway = Arc::new(
        StubGateway::new()
            .failing(operation::LOGON, "Invalid username or password")
            .returning(operation::LOGON, "session-2"),
    );
    let session = session_with(&gateway, Credentials::new("admin", "wrong"));

    let err = session.logon().await.unwrap_err();
    assert_eq!(err.operation(), operation::LOGON);
    assert!(err.gateway_error().unwrap().is_fault());
    assert!(!session.is_logged_on());

    assert_eq!(session.logon().await.unwrap(), "session-2");
    assert_eq!(gateway.calls_to(operation::LOGON).len(), 2);
}

#[tokio::test]
async fn test_logon_error_is_passed_through_unchanged() {
    let gateway = Arc::new(StubGateway::new().respond(
        operation::LOGON,
        Err(GatewayError::Transport("connection refused".to_string())),
    ));
    let session = session_with(&gateway, Credentials::new("admin", "hunter2"));

    let err = session.logon().await.unwrap_err();
    assert_eq!(
        err.gateway_error(),
        Some(&GatewayError::Transport("connection refused".to_string()))
    );

    // 错误信息带操作名，但不泄露密码
    let message = err.to_string();
    assert!(message.contains("IWebsessionManager_logon"));
    assert!(message.contains("username=admin"));
    assert!(!message.contains("hunter2"));
}

#[tokio::test]
async fn test_empty_logon_handle_is_rejected() {
    let gateway = Arc::new(StubGateway::new().returning(operation::LOGON, ""));
    let session = session_with(&gateway, Credentials::anonymous());

    let err = session.logon().await.unwrap_err();
    assert!(matches!(err, VboxError::MissingReturnValue { .. }));
    assert_eq!(session.session_id(), None);
}

// ============================================
// 硬盘
// ============================================

#[tokio::test]
async fn test_create_hard_disk_passes_id_through() {
    let gateway = Arc::new(logged_in_stub().returning(operation::CREATE_HARD_DISK, "disk-42"));
    let session = session_with(&gateway, Credentials::anonymous());

    let disk = session
        .create_hard_disk("VDI", "/vms/disk.vdi")
        .await
        .unwrap();
    assert_eq!(disk.id(), "disk-42");
    assert!(std::ptr::eq(disk.session(), &session));

    let requests = gateway.calls_to(operation::CREATE_HARD_DISK);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].get("_this"), Some("session-1"));
    assert_eq!(requests[0].get("format"), Some("VDI"));
    assert_eq!(requests[0].get("location"), Some("/vms/disk.vdi"));
}

#[tokio::test]
async fn test_create_hard_disk_logs_on_first() {
    let gateway = Arc::new(logged_in_stub().returning(operation::CREATE_HARD_DISK, "disk-1"));
    let session = session_with(&gateway, Credentials::anonymous());

    session.create_hard_disk("VMDK", "/vms/a.vmdk").await.unwrap();

    let operations: Vec<String> = gateway.calls().into_iter().map(|(op, _)| op).collect();
    assert_eq!(
        operations,
        vec![operation::LOGON.to_string(), operation::CREATE_HARD_DISK.to_string()]
    );
    assert_eq!(session.session_id(), Some("session-1"));
}

#[tokio::test]
async fn test_create_hard_disk_error_propagates() {
    let gateway = Arc::new(
        logged_in_stub().failing(operation::CREATE_HARD_DISK, "Could not find file for the medium"),
    );
    let session = session_with(&gateway, Credentials::new("admin", "secret"));

    let err = session
        .create_hard_disk("bogus", "/nowhere.img")
        .await
        .unwrap_err();

    assert_eq!(err.operation(), operation::CREATE_HARD_DISK);
    assert!(matches!(
        err.gateway_error(),
        Some(GatewayError::Fault { message, .. }) if message == "Could not find file for the medium"
    ));
    assert!(err.to_string().contains("location=/nowhere.img"));

    // 会话状态不受影响
    assert_eq!(session.session_id(), Some("session-1"));
    assert_eq!(session.credentials(), &Credentials::new("admin", "secret"));
}

#[tokio::test]
async fn test_logon_failure_aborts_disk_creation() {
    let gateway = Arc::new(
        StubGateway::new()
            .failing(operation::LOGON, "Invalid username or password")
            .returning(operation::CREATE_HARD_DISK, "disk-1"),
    );
    let session = session_with(&gateway, Credentials::anonymous());

    let err = session
        .create_hard_disk("VDI", "/vms/disk.vdi")
        .await
        .unwrap_err();

    assert_eq!(err.operation(), operation::LOGON);
    assert!(gateway.calls_to(operation::CREATE_HARD_DISK).is_empty());
}

#[tokio::test]
async fn test_independent_disk_creation() {
    let gateway = Arc::new(
        logged_in_stub()
            .returning(operation::CREATE_HARD_DISK, "disk-1")
            .returning(operation::CREATE_HARD_DISK, "disk-2"),
    );
    let session = session_with(&gateway, Credentials::new("admin", "secret"));

    let first = session.create_hard_disk("VDI", "/vms/a.vdi").await.unwrap();
    let second = session.create_hard_disk("VMDK", "/vms/b.vmdk").await.unwrap();

    assert_eq!(first.id(), "disk-1");
    assert_eq!(second.id(), "disk-2");

    let requests = gateway.calls_to(operation::CREATE_HARD_DISK);
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].get("format"), Some("VDI"));
    assert_eq!(requests[0].get("location"), Some("/vms/a.vdi"));
    assert_eq!(requests[1].get("format"), Some("VMDK"));
    assert_eq!(requests[1].get("location"), Some("/vms/b.vmdk"));

    assert_eq!(gateway.calls_to(operation::LOGON).len(), 1);
    assert_eq!(session.session_id(), Some("session-1"));
    assert_eq!(session.credentials(), &Credentials::new("admin", "secret"));
}

#[tokio::test]
async fn test_medium_attributes() {
    let gateway = Arc::new(
        logged_in_stub()
            .returning(operation::CREATE_HARD_DISK, "disk-7")
            .returning(operation::MEDIUM_GET_LOCATION, "/vms/disk.vdi")
            .returning(operation::MEDIUM_GET_FORMAT, "VDI"),
    );
    let session = session_with(&gateway, Credentials::anonymous());

    let disk = session.create_hard_disk("VDI", "/vms/disk.vdi").await.unwrap();
    assert_eq!(disk.location().await.unwrap(), "/vms/disk.vdi");
    assert_eq!(disk.format().await.unwrap(), "VDI");

    let requests = gateway.calls_to(operation::MEDIUM_GET_LOCATION);
    assert_eq!(requests[0].get("_this"), Some("disk-7"));
}

// ============================================
// 虚拟机与网卡
// ============================================

#[tokio::test]
async fn test_find_machine() {
    let gateway = Arc::new(
        logged_in_stub()
            .returning(operation::FIND_MACHINE, "machine-1")
            .returning(operation::MACHINE_GET_NAME, "ubuntu"),
    );
    let session = session_with(&gateway, Credentials::anonymous());

    let machine = session.find_machine("ubuntu").await.unwrap();
    assert_eq!(machine.id(), "machine-1");
    assert_eq!(machine.name().await.unwrap(), "ubuntu");

    let requests = gateway.calls_to(operation::FIND_MACHINE);
    assert_eq!(requests[0].get("_this"), Some("session-1"));
    assert_eq!(requests[0].get("nameOrId"), Some("ubuntu"));
}

#[tokio::test]
async fn test_list_machines() {
    let gateway = Arc::new(logged_in_stub().respond(
        operation::GET_MACHINES,
        Ok(Payload::new()
            .with(RETURN_VALUE, "machine-1")
            .with(RETURN_VALUE, "machine-2")),
    ));
    let session = session_with(&gateway, Credentials::anonymous());

    let machines = session.machines().await.unwrap();
    let ids: Vec<&str> = machines.iter().map(|m| m.id()).collect();
    assert_eq!(ids, vec!["machine-1", "machine-2"]);

    let gateway = Arc::new(logged_in_stub().respond(operation::GET_MACHINES, Ok(Payload::new())));
    let session = session_with(&gateway, Credentials::anonymous());
    assert!(session.machines().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_chipset_type() {
    let gateway = Arc::new(
        logged_in_stub()
            .returning(operation::FIND_MACHINE, "machine-1")
            .returning(operation::MACHINE_GET_CHIPSET_TYPE, "ICH9")
            .returning(operation::MACHINE_GET_CHIPSET_TYPE, "SomethingNew"),
    );
    let session = session_with(&gateway, Credentials::anonymous());
    let machine = session.find_machine("machine-1").await.unwrap();

    assert_eq!(machine.chipset_type().await.unwrap(), ChipsetType::Ich9);
    assert_eq!(
        machine.chipset_type().await.unwrap(),
        ChipsetType::Other("SomethingNew".to_string())
    );

    let requests = gateway.calls_to(operation::MACHINE_GET_CHIPSET_TYPE);
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].get("_this"), Some("machine-1"));
}

#[tokio::test]
async fn test_network_adapter_slot_is_sent_literally() {
    let gateway = Arc::new(
        logged_in_stub()
            .returning(operation::FIND_MACHINE, "machine-1")
            .returning(operation::MACHINE_GET_NETWORK_ADAPTER, "adapter-3"),
    );
    let session = session_with(&gateway, Credentials::anonymous());
    let machine = session.find_machine("vm").await.unwrap();

    let adapter = machine.network_adapter(3).await.unwrap();
    assert_eq!(adapter.id(), "adapter-3");
    assert!(std::ptr::eq(adapter.session(), machine.session()));

    let requests = gateway.calls_to(operation::MACHINE_GET_NETWORK_ADAPTER);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].get("_this"), Some("machine-1"));
    assert_eq!(requests[0].get("slot"), Some("3"));
}

#[tokio::test]
async fn test_network_adapter_is_not_cached() {
    let gateway = Arc::new(
        logged_in_stub()
            .returning(operation::FIND_MACHINE, "machine-1")
            .returning(operation::MACHINE_GET_NETWORK_ADAPTER, "adapter-0"),
    );
    let session = session_with(&gateway, Credentials::anonymous());
    let machine = session.find_machine("vm").await.unwrap();

    machine.network_adapter(0).await.unwrap();
    machine.network_adapter(0).await.unwrap();

    assert_eq!(gateway.calls_to(operation::MACHINE_GET_NETWORK_ADAPTER).len(), 2);
}

#[tokio::test]
async fn test_network_adapter_out_of_range_is_remote_error() {
    let gateway = Arc::new(
        logged_in_stub()
            .returning(operation::FIND_MACHINE, "machine-1")
            .failing(operation::MACHINE_GET_NETWORK_ADAPTER, "Invalid slot number: 99"),
    );
    let session = session_with(&gateway, Credentials::anonymous());
    let machine = session.find_machine("vm").await.unwrap();

    let err = machine.network_adapter(99).await.unwrap_err();
    assert_eq!(err.operation(), operation::MACHINE_GET_NETWORK_ADAPTER);
    assert!(err.to_string().contains("slot=99"));
}

#[tokio::test]
async fn test_network_adapter_attributes() {
    let gateway = Arc::new(
        logged_in_stub()
            .returning(operation::FIND_MACHINE, "machine-1")
            .returning(operation::MACHINE_GET_NETWORK_ADAPTER, "adapter-0")
            .returning(operation::ADAPTER_GET_MAC_ADDRESS, "080027A1B2C3")
            .returning(operation::ADAPTER_GET_ENABLED, "true"),
    );
    let session = session_with(&gateway, Credentials::anonymous());
    let machine = session.find_machine("vm").await.unwrap();
    let adapter = machine.network_adapter(0).await.unwrap();

    assert_eq!(adapter.mac_address().await.unwrap(), "080027A1B2C3");
    assert!(adapter.enabled().await.unwrap());

    let requests = gateway.calls_to(operation::ADAPTER_GET_MAC_ADDRESS);
    assert_eq!(requests[0].get("_this"), Some("adapter-0"));
}
